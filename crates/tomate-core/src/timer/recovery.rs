//! Startup recovery of a persisted session.
//!
//! The app may have been suspended or killed for seconds or days. A
//! snapshot that was running when written is fast-forwarded against the
//! wall clock, crossing at most [`MAX_CATCH_UP_TRANSITIONS`] segment
//! boundaries so an ancient timestamp cannot spin.

use super::clock::signed_remaining_secs;
use super::segment::{next_segment, Durations, Mode, Segment};
use super::settings::Settings;
use super::state::SessionState;
use crate::storage::Snapshot;

pub const MAX_CATCH_UP_TRANSITIONS: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub state: SessionState,
    /// Segment boundaries crossed while catching up.
    pub transitions: u8,
}

/// Resolve `snapshot` into a live state at `now_ms`.
///
/// `settings` and `durations` are the ones the restored session will run
/// with (already derived from the snapshot by the caller).
pub fn recover(
    snapshot: &Snapshot,
    settings: Settings,
    durations: &Durations,
    auto_start: bool,
    now_ms: i64,
) -> Recovered {
    let mut state = SessionState {
        segment: snapshot.current_segment,
        mode: Mode::Idle,
        is_running: false,
        remaining_seconds: snapshot.remaining_seconds,
        end_timestamp_ms: None,
        pomodoros_completed: snapshot.pomodoros_completed,
        settings,
    };

    if snapshot.mode == Mode::Paused {
        state.mode = Mode::Paused;
        return Recovered {
            state,
            transitions: 0,
        };
    }

    if snapshot.mode == Mode::Idle {
        state.segment = Segment::Focus;
        state.remaining_seconds = durations.focus;
        return Recovered {
            state,
            transitions: 0,
        };
    }

    if !snapshot.is_running {
        state.mode = state.segment.into();
        if state.remaining_seconds == 0 {
            state.remaining_seconds = durations.of(state.segment);
        }
        return Recovered {
            state,
            transitions: 0,
        };
    }

    let Some(end) = snapshot.end_timestamp_ms else {
        tracing::warn!("snapshot claims running without an end timestamp; restoring paused");
        state.mode = Mode::Paused;
        return Recovered {
            state,
            transitions: 0,
        };
    };

    catch_up(state, end, durations, auto_start, now_ms)
}

fn catch_up(
    mut state: SessionState,
    mut end: i64,
    durations: &Durations,
    auto_start: bool,
    now_ms: i64,
) -> Recovered {
    let mut remaining = signed_remaining_secs(end, now_ms);
    let mut transitions = 0u8;

    while remaining <= 0 && transitions < MAX_CATCH_UP_TRANSITIONS {
        let finished = state.segment;
        if finished == Segment::Focus {
            state.pomodoros_completed = state.pomodoros_completed.saturating_add(1);
        }
        let next = next_segment(
            finished,
            state.pomodoros_completed,
            state.settings.long_break_every,
        );
        transitions += 1;

        if !auto_start {
            state.enter(next, durations.of(next), false, now_ms);
            return Recovered { state, transitions };
        }

        state.segment = next;
        let duration_ms = i64::try_from(durations.of(next))
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        end = end.saturating_add(duration_ms);
        remaining = signed_remaining_secs(end, now_ms);
    }

    if remaining <= 0 {
        // Still overdue after the cap; the next tick performs the transition.
        remaining = 0;
        end = now_ms;
    }

    state.mode = state.segment.into();
    state.is_running = true;
    state.end_timestamp_ms = Some(end);
    state.remaining_seconds = u64::try_from(remaining).unwrap_or(0);
    Recovered { state, transitions }
}
