//! Session state machine.
//!
//! Like the rest of the timer, the engine is wall-clock based and has no
//! internal thread: the owner calls `tick()` about once a second while the
//! session runs. Remaining time is always re-derived from the end instant,
//! so a suspended process picks up exactly where the clock says it is.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Focus(running) --pause--> Paused --resume--> Focus(running)
//! Focus --expire--> ShortBreak | LongBreak (running iff auto_start)
//! ShortBreak | LongBreak --expire--> Focus (running iff auto_start)
//! ShortBreak | LongBreak --skip_break--> Focus(running)
//! any --reset--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(SessionOptions::default())
//!     .with_store(Box::new(store));
//! engine.restore();
//! engine.start();
//! // Once a second while running:
//! engine.tick(); // Some(Event::SegmentCompleted { .. }) at a boundary
//! ```

use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::recovery::recover;
use super::segment::{next_segment, Durations, Mode, Segment};
use super::settings::{Settings, SettingsPatch};
use super::state::{SessionState, SessionView};
use crate::events::{Event, SessionObserver};
use crate::gateway::{
    Feedback, NoopFeedback, NoopNotifier, Notifier, ReminderKind, SnapshotStore,
};
use crate::storage::{MemorySnapshotStore, Snapshot};

/// Construction-time behavior of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Settings used until a restored snapshot supplies its own.
    pub settings: Settings,
    /// Start the next segment as soon as the current one expires.
    pub auto_start: bool,
    /// Use [`Durations::DEV`] instead of deriving from settings.
    pub dev_durations: bool,
}

pub struct SessionEngine {
    state: SessionState,
    options: SessionOptions,
    clock: Box<dyn Clock>,
    store: Box<dyn SnapshotStore>,
    notifier: Box<dyn Notifier>,
    feedback: Box<dyn Feedback>,
    observer: Option<Box<dyn SessionObserver>>,
    /// Set while a segment boundary is being processed.
    transitioning: bool,
    /// A user command arrived; persisted state must no longer win.
    command_received: bool,
    restored: bool,
}

impl SessionEngine {
    /// Create an idle engine. Gateways default to an in-memory store and
    /// no-op notifier/feedback until replaced with the `with_*` methods.
    pub fn new(options: SessionOptions) -> Self {
        let options = SessionOptions {
            settings: options.settings.sanitized(),
            ..options
        };
        let durations = durations_for(&options, &options.settings);
        Self {
            state: SessionState::initial(options.settings, &durations),
            options,
            clock: Box::new(SystemClock),
            store: Box::new(MemorySnapshotStore::new()),
            notifier: Box::new(NoopNotifier),
            feedback: Box::new(NoopFeedback),
            observer: None,
            transitioning: false,
            command_received: false,
            restored: false,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_store(mut self, store: Box<dyn SnapshotStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_feedback(mut self, feedback: Box<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn settings(&self) -> Settings {
        self.state.settings
    }

    pub fn durations(&self) -> Durations {
        durations_for(&self.options, &self.state.settings)
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Remaining seconds as observers should see them right now.
    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_at(self.clock.now_ms())
    }

    pub fn view(&self) -> SessionView {
        self.state.view(self.clock.now_ms())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            view: self.view(),
            at: self.at(),
        }
    }

    // ── Startup ──────────────────────────────────────────────────────

    /// Load the persisted snapshot and apply it.
    pub fn restore(&mut self) -> Option<Event> {
        let snapshot = self.store.load();
        self.restore_from(snapshot)
    }

    /// Apply an already loaded snapshot.
    ///
    /// Ignored once any command has been issued: explicit user intent wins
    /// over whatever was on disk.
    pub fn restore_from(&mut self, snapshot: Option<Snapshot>) -> Option<Event> {
        if self.restored {
            return None;
        }
        self.restored = true;
        if self.command_received {
            tracing::debug!("command arrived before restore; keeping live session");
            return None;
        }
        let snapshot = snapshot?;

        let settings = snapshot.resolved_settings(self.state.settings);
        let durations = durations_for(&self.options, &settings);
        let now = self.clock.now_ms();
        let recovered = recover(&snapshot, settings, &durations, self.options.auto_start, now);
        self.state = recovered.state;

        tracing::info!(
            mode = ?self.state.mode,
            segment = ?self.state.segment,
            running = self.state.is_running,
            transitions = recovered.transitions,
            "restored session"
        );

        self.persist();
        if self.state.is_running {
            self.notifier.cancel_all_reminders();
            self.schedule_reminder();
        }

        let view = self.view();
        self.emit(Event::SessionRestored {
            mode: view.mode,
            segment: view.segment,
            running: view.is_running,
            remaining_secs: view.remaining_seconds,
            transitions: recovered.transitions,
            at: self.at(),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.command_received = true;
        if self.state.is_running {
            return None;
        }

        let resuming = self.state.mode == Mode::Paused;
        if self.state.mode == Mode::Idle {
            self.state.segment = Segment::Focus;
            self.state.remaining_seconds = self.durations().focus;
        } else if self.state.remaining_seconds == 0 {
            self.state.remaining_seconds = self.durations().of(self.state.segment);
        }
        self.state.run_from(self.clock.now_ms());
        tracing::debug!(segment = ?self.state.segment, resuming, "segment running");

        self.notifier.cancel_all_reminders();
        self.schedule_reminder();
        self.feedback.play_start_cue();
        self.feedback.haptic_start();
        self.persist();

        let segment = self.state.segment;
        let remaining_secs = self.state.remaining_seconds;
        let at = self.at();
        self.emit(if resuming {
            Event::SessionResumed {
                segment,
                remaining_secs,
                at,
            }
        } else {
            Event::SessionStarted {
                segment,
                remaining_secs,
                at,
            }
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.command_received = true;
        if !self.state.is_running {
            return None;
        }
        // An overdue segment completes instead of freezing at zero.
        if self.remaining_seconds() == 0 {
            self.tick();
            if !self.state.is_running {
                return None;
            }
        }

        self.state.remaining_seconds = self.remaining_seconds();
        self.state.is_running = false;
        self.state.end_timestamp_ms = None;
        self.state.mode = Mode::Paused;
        tracing::debug!(remaining = self.state.remaining_seconds, "paused");

        self.notifier.cancel_all_reminders();
        self.persist();

        self.emit(Event::SessionPaused {
            segment: self.state.segment,
            remaining_secs: self.state.remaining_seconds,
            at: self.at(),
        })
    }

    /// Continue a paused segment. No-op in any other mode.
    pub fn resume(&mut self) -> Option<Event> {
        self.command_received = true;
        if self.state.mode != Mode::Paused {
            return None;
        }
        self.start()
    }

    /// Return to the idle focus start, clearing persisted state.
    pub fn reset(&mut self) -> Option<Event> {
        self.command_received = true;
        let durations = self.durations();
        self.state = SessionState::initial(self.state.settings, &durations);
        self.transitioning = false;
        tracing::debug!("session reset");

        self.notifier.cancel_all_reminders();
        self.store.clear();

        self.emit(Event::SessionReset { at: self.at() })
    }

    /// End a break early and start focusing. No-op outside a break.
    pub fn skip_break(&mut self) -> Option<Event> {
        self.command_received = true;
        let skipped = match self.state.mode {
            Mode::ShortBreak => Segment::ShortBreak,
            Mode::LongBreak => Segment::LongBreak,
            _ => return None,
        };

        let focus = self.durations().focus;
        self.state.enter(Segment::Focus, focus, true, self.clock.now_ms());
        tracing::debug!(?skipped, "break skipped");

        self.notifier.cancel_all_reminders();
        self.schedule_reminder();
        self.feedback.play_start_cue();
        self.feedback.haptic_start();
        self.persist();

        self.emit(Event::BreakSkipped {
            skipped,
            remaining_secs: self.state.remaining_seconds,
            at: self.at(),
        })
    }

    /// Sanitize and store new settings.
    ///
    /// A stopped session shows the new duration for its segment right away;
    /// a running one finishes its segment on the old duration.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Option<Event> {
        self.command_received = true;
        self.state.settings = self.state.settings.sanitize(patch);
        if !self.state.is_running {
            self.state.remaining_seconds = self.durations().of(self.state.segment);
        }
        tracing::debug!(settings = ?self.state.settings, "settings updated");

        self.persist();

        self.emit(Event::SettingsUpdated {
            settings: self.state.settings,
            remaining_secs: self.remaining_seconds(),
            at: self.at(),
        })
    }

    /// Call periodically while running. Returns
    /// `Some(Event::SegmentCompleted)` when a segment boundary is crossed.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running || self.transitioning {
            return None;
        }
        let remaining = self.remaining_seconds();
        self.state.remaining_seconds = remaining;
        if remaining > 0 {
            return None;
        }

        self.transitioning = true;
        if self.state.segment == Segment::Focus {
            self.feedback.play_focus_end_cue();
        } else {
            self.feedback.play_break_end_cue();
        }
        self.feedback.haptic_end();
        let event = self.advance_segment();
        self.transitioning = false;
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_segment(&mut self) -> Option<Event> {
        let finished = self.state.segment;
        if finished == Segment::Focus {
            self.state.pomodoros_completed = self.state.pomodoros_completed.saturating_add(1);
        }
        let next = next_segment(
            finished,
            self.state.pomodoros_completed,
            self.state.settings.long_break_every,
        );
        let run = self.options.auto_start;
        let duration = self.durations().of(next);
        self.state.enter(next, duration, run, self.clock.now_ms());
        tracing::debug!(?finished, ?next, run, "segment completed");

        self.notifier.cancel_all_reminders();
        if run {
            self.schedule_reminder();
        }
        self.persist();

        self.emit(Event::SegmentCompleted {
            finished,
            next,
            running: run,
            pomodoros_completed: self.state.pomodoros_completed,
            at: self.at(),
        })
    }

    fn schedule_reminder(&self) {
        let secs = self.remaining_seconds();
        if secs > 0 {
            self.notifier
                .schedule_reminder(ReminderKind::for_segment(self.state.segment), secs);
        }
    }

    fn persist(&self) {
        let now = self.clock.now_ms();
        let snapshot = Snapshot {
            mode: self.state.mode,
            is_running: self.state.is_running,
            current_segment: self.state.segment,
            pomodoros_completed: self.state.pomodoros_completed,
            end_timestamp_ms: self.state.end_timestamp_ms,
            remaining_seconds: self.state.remaining_at(now),
            settings: Some(self.state.settings.into()),
            durations: Some(self.durations()),
            updated_at: now,
        };
        self.store.save(&snapshot);
    }

    fn emit(&self, event: Event) -> Option<Event> {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
        Some(event)
    }

    fn at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.now_ms()).unwrap_or_else(Utc::now)
    }
}

fn durations_for(options: &SessionOptions, settings: &Settings) -> Durations {
    if options.dev_durations {
        Durations::DEV
    } else {
        Durations::from_settings(settings)
    }
}
