use serde::{Deserialize, Serialize};

use super::clock::remaining_secs;
use super::segment::{Durations, Mode, Segment};
use super::settings::Settings;

/// The mutable session record.
///
/// `end_timestamp_ms` is `Some` exactly when `is_running`. While running,
/// `remaining_seconds` is only a cache; the end instant is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub segment: Segment,
    pub mode: Mode,
    pub is_running: bool,
    pub remaining_seconds: u64,
    pub end_timestamp_ms: Option<i64>,
    pub pomodoros_completed: u32,
    pub settings: Settings,
}

impl SessionState {
    /// Fresh state: idle, at the start of a focus segment.
    pub fn initial(settings: Settings, durations: &Durations) -> Self {
        Self {
            segment: Segment::Focus,
            mode: Mode::Idle,
            is_running: false,
            remaining_seconds: durations.focus,
            end_timestamp_ms: None,
            pomodoros_completed: 0,
            settings,
        }
    }

    /// Remaining time as observers should see it at `now_ms`.
    pub fn remaining_at(&self, now_ms: i64) -> u64 {
        match (self.is_running, self.end_timestamp_ms) {
            (true, Some(end)) => remaining_secs(end, now_ms),
            _ => self.remaining_seconds,
        }
    }

    /// Make `segment` current with its full duration, running or not.
    pub fn enter(&mut self, segment: Segment, duration: u64, run: bool, now_ms: i64) {
        self.segment = segment;
        self.mode = segment.into();
        self.remaining_seconds = duration;
        if run {
            self.run_from(now_ms);
        } else {
            self.is_running = false;
            self.end_timestamp_ms = None;
        }
    }

    /// Start counting the stored remaining time down from `now_ms`.
    pub fn run_from(&mut self, now_ms: i64) {
        let remaining_ms = i64::try_from(self.remaining_seconds)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        self.is_running = true;
        self.end_timestamp_ms = Some(now_ms.saturating_add(remaining_ms));
        self.mode = self.segment.into();
    }

    pub fn view(&self, now_ms: i64) -> SessionView {
        let label_segment = self.mode.segment().unwrap_or(self.segment);
        SessionView {
            mode: self.mode,
            segment: self.segment,
            is_running: self.is_running,
            remaining_seconds: self.remaining_at(now_ms),
            pomodoros_completed: self.pomodoros_completed,
            label: label_segment.label().to_string(),
            settings: self.settings,
        }
    }
}

/// Read-only projection handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub mode: Mode,
    pub segment: Segment,
    pub is_running: bool,
    pub remaining_seconds: u64,
    pub pomodoros_completed: u32,
    pub label: String,
    pub settings: Settings,
}

impl SessionView {
    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }
}
