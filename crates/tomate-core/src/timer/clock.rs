use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Wall-clock source, in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.fetch_add(secs.saturating_mul(1000), Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Whole seconds left until `end_ms`, rounded up, never negative.
pub fn remaining_secs(end_ms: i64, now_ms: i64) -> u64 {
    let signed = signed_remaining_secs(end_ms, now_ms);
    u64::try_from(signed).unwrap_or(0)
}

/// Whole seconds left until `end_ms`, rounded up. Negative once overdue.
pub fn signed_remaining_secs(end_ms: i64, now_ms: i64) -> i64 {
    let diff = end_ms.saturating_sub(now_ms);
    // Ceiling division that also holds for negative differences.
    diff.div_euclid(1000) + i64::from(diff.rem_euclid(1000) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_rounds_up() {
        assert_eq!(remaining_secs(10_001, 0), 11);
        assert_eq!(remaining_secs(10_000, 0), 10);
        assert_eq!(remaining_secs(1, 0), 1);
    }

    #[test]
    fn remaining_never_negative() {
        assert_eq!(remaining_secs(0, 5_000), 0);
        assert_eq!(signed_remaining_secs(0, 5_000), -5);
        assert_eq!(signed_remaining_secs(0, 4_500), -4);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        clock.advance_secs(2);
        assert_eq!(other.now_ms(), 3_000);
    }
}
