use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Rest or mobility countdown advanced one second per [`Countdown::tick`].
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    status: TimerStatus,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            status: TimerStatus::Idle,
        }
    }

    #[cfg(test)]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Starts or resumes. A completed countdown stays completed until [`Countdown::reset`].
    pub fn start(&mut self) {
        if matches!(self.status, TimerStatus::Idle | TimerStatus::Paused) {
            self.status = TimerStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.status = TimerStatus::Idle;
    }

    /// Advances one second. Returns `true` only on the tick that completes the run.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.status = TimerStatus::Completed;
            return true;
        }
        false
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    pub key: String,
    pub remaining: u32,
    pub display: String,
    pub state: TimerStatus,
}

/// All countdowns of the page, keyed by exercise instance.
#[derive(Debug, Default)]
pub struct TimerBoard {
    timers: BTreeMap<String, Countdown>,
    completed: Vec<String>,
}

impl TimerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the countdown for `key`, creating it with `duration` on first use.
    pub fn toggle(&mut self, key: &str, duration: u32) -> TimerView {
        let timer = self
            .timers
            .entry(key.to_string())
            .or_insert_with(|| Countdown::new(duration));
        timer.toggle();
        view(key, timer)
    }

    pub fn reset(&mut self, key: &str, duration: u32) -> TimerView {
        let timer = self
            .timers
            .entry(key.to_string())
            .or_insert_with(|| Countdown::new(duration));
        timer.reset();
        view(key, timer)
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<TimerView> {
        self.timers.get(key).map(|timer| view(key, timer))
    }

    pub fn views(&self) -> Vec<TimerView> {
        self.timers
            .iter()
            .map(|(key, timer)| view(key, timer))
            .collect()
    }

    /// Ticks every running countdown once and queues the ones that completed.
    /// A key already waiting in the queue is not queued again, so the queue
    /// never holds more entries than there are timers.
    pub fn tick_all(&mut self) -> usize {
        let mut finished = 0;
        for (key, timer) in self.timers.iter_mut() {
            if timer.tick() {
                info!(timer = %key, "countdown completed");
                if !self.completed.contains(key) {
                    self.completed.push(key.clone());
                }
                finished += 1;
            }
        }
        finished
    }

    /// Drains queued completions; each completion is returned once.
    pub fn take_completions(&mut self) -> Vec<String> {
        std::mem::take(&mut self.completed)
    }
}

fn view(key: &str, timer: &Countdown) -> TimerView {
    TimerView {
        key: key.to_string(),
        remaining: timer.remaining(),
        display: timer.display(),
        state: timer.status(),
    }
}

/// Ticks `board` every `period` until the task is dropped.
pub async fn run_ticker(board: Arc<Mutex<TimerBoard>>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of an interval fires immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        board.lock().await.tick_all();
    }
}
