//! Terminal renditions of the notification and feedback gateways.

use std::cell::RefCell;
use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;
use tomate_core::{Feedback, Notifier, ReminderKind};

/// Reminders as tokio sleep tasks that print when they fire.
///
/// They only outlive the command that scheduled them inside `timer watch`.
pub struct TerminalNotifier {
    enabled: bool,
    pending: RefCell<Vec<JoinHandle<()>>>,
}

impl TerminalNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: RefCell::new(Vec::new()),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn schedule_reminder(&self, kind: ReminderKind, secs_from_now: u64) {
        if !self.enabled || secs_from_now == 0 {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime; reminder not scheduled");
            return;
        };
        let task = runtime.spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs_from_now.max(1))).await;
            eprintln!("\n\x07{}: {}", kind.title(), kind.body());
        });
        self.pending.borrow_mut().push(task);
    }

    fn cancel_all_reminders(&self) {
        for task in self.pending.borrow_mut().drain(..) {
            task.abort();
        }
    }
}

impl Drop for TerminalNotifier {
    fn drop(&mut self) {
        self.cancel_all_reminders();
    }
}

/// Terminal bell for audio cues. There is no haptic hardware here, so
/// haptics are only traced.
pub struct TerminalFeedback {
    sound: bool,
    haptics: bool,
}

impl TerminalFeedback {
    pub fn new(sound: bool, haptics: bool) -> Self {
        Self { sound, haptics }
    }

    fn bell(&self, cue: &str) {
        if !self.sound {
            return;
        }
        tracing::debug!(cue, "sound");
        let mut err = std::io::stderr();
        if let Err(e) = err.write_all(b"\x07").and_then(|_| err.flush()) {
            tracing::warn!("failed to play {cue} cue: {e}");
        }
    }

    fn haptic(&self, pattern: &str) {
        if self.haptics {
            tracing::debug!(pattern, "haptic");
        }
    }
}

impl Feedback for TerminalFeedback {
    fn play_start_cue(&self) {
        self.bell("start");
    }

    fn play_focus_end_cue(&self) {
        self.bell("focus_end");
    }

    fn play_break_end_cue(&self) {
        self.bell("break_end");
    }

    fn haptic_start(&self) {
        self.haptic("light-light");
    }

    fn haptic_end(&self) {
        self.haptic("heavy");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_aborts_pending_reminders() {
        let notifier = TerminalNotifier::new(true);
        notifier.schedule_reminder(ReminderKind::Focus, 600);
        notifier.schedule_reminder(ReminderKind::Break, 300);
        assert_eq!(notifier.pending.borrow().len(), 2);
        notifier.cancel_all_reminders();
        assert!(notifier.pending.borrow().is_empty());
    }

    #[tokio::test]
    async fn disabled_or_zero_delay_schedules_nothing() {
        let notifier = TerminalNotifier::new(false);
        notifier.schedule_reminder(ReminderKind::Focus, 600);
        assert!(notifier.pending.borrow().is_empty());

        let notifier = TerminalNotifier::new(true);
        notifier.schedule_reminder(ReminderKind::Focus, 0);
        assert!(notifier.pending.borrow().is_empty());
    }

    #[test]
    fn scheduling_outside_runtime_is_skipped() {
        let notifier = TerminalNotifier::new(true);
        notifier.schedule_reminder(ReminderKind::Break, 10);
        assert!(notifier.pending.borrow().is_empty());
    }
}
