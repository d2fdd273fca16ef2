use crate::feedback::Feedback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub hit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HistoryLog {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTarget {
    pub speed: f64,
}

/// Adjusted targets keyed by exercise instance (`<day>_<index>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TargetBook {
    pub targets: BTreeMap<String, ExerciseTarget>,
}

/// A confirmed attempt on one exercise instance.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub key: String,
    pub hit: bool,
    /// Plan speed used when the exercise has no stored target yet.
    pub baseline: f64,
}

#[derive(Debug, Deserialize)]
pub struct OutcomeRequest {
    pub day: String,
    pub index: usize,
    pub hit: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OutcomeResponse {
    pub key: String,
    pub speed: f64,
    pub speed_display: String,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Rest,
    Mobility,
}

#[derive(Debug, Deserialize)]
pub struct TimerRequest {
    pub day: String,
    pub kind: TimerKind,
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct MainSetView {
    pub index: usize,
    pub name: String,
    pub reps: u32,
    pub rest: u32,
    pub rest_display: String,
    pub speed: f64,
    pub speed_display: String,
}

#[derive(Debug, Serialize)]
pub struct MobilityView {
    pub index: usize,
    pub name: String,
    pub duration: u32,
    pub duration_display: String,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub day: String,
    pub kind: String,
    pub explain: String,
    pub warmup: Vec<String>,
    pub main: Vec<MainSetView>,
    pub mobility: Vec<MobilityView>,
    pub feedback: Feedback,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionsResponse {
    pub completed: Vec<String>,
}

pub fn exercise_key(day: &str, index: usize) -> String {
    format!("{day}_{index}")
}

pub fn timer_key(day: &str, kind: TimerKind, index: usize) -> String {
    match kind {
        TimerKind::Rest => format!("{day}_rest_{index}"),
        TimerKind::Mobility => format!("{day}_mobility_{index}"),
    }
}

pub fn format_speed(speed: f64) -> String {
    format!("{speed:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entry_without_label_round_trips_without_field() {
        let entry: HistoryEntry = serde_json::from_str(r#"{"hit":true}"#).unwrap();
        assert_eq!(entry.label, None);
        assert_eq!(serde_json::to_string(&entry).unwrap(), r#"{"hit":true}"#);
    }

    #[test]
    fn target_book_uses_flat_key_shape() {
        let mut book = TargetBook::default();
        book.targets
            .insert(exercise_key("Monday", 0), ExerciseTarget { speed: 14.7 });
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json, serde_json::json!({ "Monday_0": { "speed": 14.7 } }));
    }

    #[test]
    fn timer_keys_distinguish_kinds() {
        assert_eq!(timer_key("Friday", TimerKind::Rest, 1), "Friday_rest_1");
        assert_eq!(timer_key("Friday", TimerKind::Mobility, 0), "Friday_mobility_0");
    }
}
