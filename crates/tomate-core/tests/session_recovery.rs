//! Restart scenarios: a session is persisted by one engine and picked up
//! by a fresh engine later, as happens when the app is killed and relaunched.

use tomate_core::storage::Database;
use tomate_core::{
    Clock, ManualClock, MemorySnapshotStore, Mode, Segment, SessionEngine, SessionOptions,
    Settings, SnapshotStore, SqliteSnapshotStore,
};

const T0: i64 = 1_700_000_000_000;

fn engine(clock: &ManualClock, store: &MemorySnapshotStore, auto_start: bool) -> SessionEngine {
    SessionEngine::new(SessionOptions {
        auto_start,
        ..Default::default()
    })
    .with_clock(Box::new(clock.clone()))
    .with_store(Box::new(store.clone()))
}

#[test]
fn long_gap_without_auto_start_lands_in_stopped_break() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::new();

    let mut first = engine(&clock, &store, false);
    first.start();
    drop(first);

    // Focus expired over an hour ago.
    clock.set(T0 + 1_500_000 + 3_700_000);
    let mut second = engine(&clock, &store, false);
    second.restore();

    let view = second.view();
    assert_eq!(view.mode, Mode::ShortBreak);
    assert!(!view.is_running);
    assert_eq!(view.remaining_seconds, 300);
    assert_eq!(view.pomodoros_completed, 1);

    let persisted = store.load().unwrap();
    assert_eq!(persisted.mode, Mode::ShortBreak);
    assert!(!persisted.is_running);
    assert_eq!(persisted.end_timestamp_ms, None);
}

#[test]
fn short_gap_with_auto_start_keeps_running_in_next_segment() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::new();

    let mut first = engine(&clock, &store, true);
    first.start();
    drop(first);

    clock.set(T0 + 1_500_000 + 200_000);
    let mut second = engine(&clock, &store, true);
    second.restore();

    let view = second.view();
    assert_eq!(view.mode, Mode::ShortBreak);
    assert!(view.is_running);
    assert_eq!(view.remaining_seconds, 100);

    // The recovered break keeps counting down on the wall clock.
    clock.advance_secs(100);
    assert!(second.tick().is_some());
    assert_eq!(second.view().segment, Segment::Focus);
}

#[test]
fn ancient_snapshot_with_auto_start_stops_catching_up_after_two_boundaries() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::new();

    let mut first = engine(&clock, &store, true);
    first.start();
    drop(first);

    clock.set(T0 + 7 * 86_400_000);
    let mut second = engine(&clock, &store, true);
    second.restore();

    let view = second.view();
    assert!(view.is_running);
    assert_eq!(view.segment, Segment::Focus);
    assert_eq!(view.remaining_seconds, 0);
    assert_eq!(view.pomodoros_completed, 1);

    // One more boundary on the next tick.
    assert!(second.tick().is_some());
    assert_eq!(second.view().segment, Segment::ShortBreak);
    assert_eq!(second.view().pomodoros_completed, 2);
}

#[test]
fn paused_session_survives_restart_untouched() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::new();

    let mut first = engine(&clock, &store, false);
    first.start();
    clock.advance_secs(600);
    first.pause();
    drop(first);

    clock.advance_secs(86_400);
    let mut second = engine(&clock, &store, false);
    second.restore();
    assert_eq!(second.mode(), Mode::Paused);
    assert_eq!(second.remaining_seconds(), 900);

    second.resume();
    assert!(second.is_running());
    assert_eq!(second.remaining_seconds(), 900);
}

#[test]
fn restored_settings_come_from_snapshot() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::new();

    let mut first = engine(&clock, &store, false);
    first.update_settings(&tomate_core::SettingsPatch {
        focus_minutes: Some(50.0),
        long_break_every: Some(2.0),
        ..Default::default()
    });
    drop(first);

    let mut second = engine(&clock, &store, false);
    assert_eq!(second.settings(), Settings::default());
    second.restore();
    assert_eq!(second.settings().focus_minutes, 50);
    assert_eq!(second.settings().long_break_every, 2);
    assert_eq!(second.remaining_seconds(), 3000);
}

#[test]
fn malformed_record_falls_back_to_defaults() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::with_raw("{\"mode\": 7}");
    let mut e = engine(&clock, &store, false);
    assert!(e.restore().is_none());
    assert_eq!(e.mode(), Mode::Idle);
    assert_eq!(e.remaining_seconds(), 1500);
}

#[test]
fn reset_leaves_nothing_to_restore() {
    let clock = ManualClock::new(T0);
    let store = MemorySnapshotStore::new();

    let mut first = engine(&clock, &store, true);
    first.start();
    first.reset();
    assert!(store.load().is_none());
    drop(first);

    let mut second = engine(&clock, &store, true);
    assert!(second.restore().is_none());
    assert_eq!(second.mode(), Mode::Idle);
}

#[test]
fn sqlite_store_carries_session_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomate.db");
    let clock = ManualClock::new(T0);

    {
        let store = SqliteSnapshotStore::new(Database::open_at(&path).unwrap());
        let mut first = SessionEngine::new(SessionOptions::default())
            .with_clock(Box::new(clock.clone()))
            .with_store(Box::new(store));
        first.start();
    }

    clock.advance_secs(60);
    let store = SqliteSnapshotStore::new(Database::open_at(&path).unwrap());
    let mut second = SessionEngine::new(SessionOptions::default())
        .with_clock(Box::new(clock.clone()))
        .with_store(Box::new(store));
    second.restore();
    assert!(second.is_running());
    assert_eq!(second.remaining_seconds(), 1440);
    assert_eq!(clock.now_ms(), T0 + 60_000);
}
