//! Outbound seams of the session machine.
//!
//! Every method here is fire-and-forget: implementations return
//! immediately, never block the caller on completion, and absorb their
//! own failures. Timer correctness never depends on any of them.

use serde::{Deserialize, Serialize};

use crate::storage::Snapshot;
use crate::timer::Segment;

/// Load/save/clear the single persisted session record.
pub trait SnapshotStore {
    /// Best-effort read. Missing or malformed data is `None`.
    fn load(&self) -> Option<Snapshot>;

    fn save(&self, snapshot: &Snapshot);

    /// Remove the record entirely.
    fn clear(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// A focus segment is ending.
    Focus,
    /// A break is ending.
    Break,
}

impl ReminderKind {
    pub fn for_segment(segment: Segment) -> Self {
        if segment.is_break() {
            ReminderKind::Break
        } else {
            ReminderKind::Focus
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReminderKind::Focus => "Focus finished",
            ReminderKind::Break => "Break finished",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            ReminderKind::Focus => "Time for a break.",
            ReminderKind::Break => "Time to focus.",
        }
    }
}

/// Schedules the "segment ends in N seconds" reminder.
pub trait Notifier {
    /// Implementations treat `secs_from_now == 0` as a no-op.
    fn schedule_reminder(&self, kind: ReminderKind, secs_from_now: u64);

    fn cancel_all_reminders(&self);
}

/// Short audio and haptic cues at segment boundaries.
pub trait Feedback {
    fn play_start_cue(&self);
    fn play_focus_end_cue(&self);
    fn play_break_end_cue(&self);
    fn haptic_start(&self);
    fn haptic_end(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn schedule_reminder(&self, _kind: ReminderKind, _secs_from_now: u64) {}
    fn cancel_all_reminders(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl Feedback for NoopFeedback {
    fn play_start_cue(&self) {}
    fn play_focus_end_cue(&self) {}
    fn play_break_end_cue(&self) {}
    fn haptic_start(&self) {}
    fn haptic_end(&self) {}
}
