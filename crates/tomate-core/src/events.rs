use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, Segment, SessionView, Settings};

/// Every state change of the session produces an Event.
/// Commands return the event; observers receive a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        segment: Segment,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        segment: Segment,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        segment: Segment,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A segment ran out and the next one became current.
    SegmentCompleted {
        finished: Segment,
        next: Segment,
        running: bool,
        pomodoros_completed: u32,
        at: DateTime<Utc>,
    },
    BreakSkipped {
        skipped: Segment,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Persisted state was applied at startup.
    SessionRestored {
        mode: Mode,
        segment: Segment,
        running: bool,
        remaining_secs: u64,
        /// Segment boundaries crossed while the app was away.
        transitions: u8,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        view: SessionView,
        at: DateTime<Utc>,
    },
}

/// Receives every event the machine emits.
pub trait SessionObserver {
    fn on_event(&self, event: &Event);
}
