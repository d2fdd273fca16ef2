use crate::models::HistoryEntry;
use serde::{Deserialize, Serialize};

pub const SPEED_STEP: f64 = 0.1;
pub const MIN_SPEED: f64 = 8.0;
pub const MAX_SPEED: f64 = 20.0;
pub const DEFAULT_WINDOW: usize = 12;

const NOT_ENOUGH_DATA: &str = "Complete a few sessions to unlock personalised feedback.";
const ON_TRACK: &str = "You’re consistently hitting targets. Training is progressing well — stay controlled and confident.";
const MIXED: &str = "Mixed results this week. You’re on track — focus on pacing and relaxed form.";
const FATIGUE: &str = "Recent sessions suggest fatigue. Paces have been adjusted to support recovery.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    NotEnoughData,
    OnTrack,
    Mixed,
    Fatigue,
}

impl FeedbackLevel {
    pub fn message(self) -> &'static str {
        match self {
            FeedbackLevel::NotEnoughData => NOT_ENOUGH_DATA,
            FeedbackLevel::OnTrack => ON_TRACK,
            FeedbackLevel::Mixed => MIXED,
            FeedbackLevel::Fatigue => FATIGUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
    pub hits: usize,
    pub total: usize,
}

/// Moves `current` one step towards the outcome and clamps it to `[min, max]`.
pub fn adjust_target(current: f64, hit: bool, step: f64, min: f64, max: f64) -> f64 {
    let next = if hit { current + step } else { current - step };
    next.clamp(min, max)
}

pub fn adjust_speed(current: f64, hit: bool) -> f64 {
    adjust_target(current, hit, SPEED_STEP, MIN_SPEED, MAX_SPEED)
}

/// Rounds to the one-decimal precision speeds are stored and shown with.
pub fn round_speed(speed: f64) -> f64 {
    (speed * 10.0).round() / 10.0
}

/// Classifies the last `window` entries of `history`.
///
/// Bands use strict comparisons: a ratio of exactly 0.8 is mixed and exactly
/// 0.5 is fatigue.
pub fn weekly_feedback(history: &[HistoryEntry], window: usize) -> Feedback {
    let start = history.len().saturating_sub(window);
    let entries = &history[start..];
    let total = entries.len();
    let hits = entries.iter().filter(|entry| entry.hit).count();

    let level = if total == 0 {
        FeedbackLevel::NotEnoughData
    } else {
        let ratio = hits as f64 / total as f64;
        if ratio > 0.8 {
            FeedbackLevel::OnTrack
        } else if ratio > 0.5 {
            FeedbackLevel::Mixed
        } else {
            FeedbackLevel::Fatigue
        }
    };

    Feedback {
        level,
        message: level.message().to_string(),
        hits,
        total,
    }
}
