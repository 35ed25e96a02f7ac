//! # Tomate Core Library
//!
//! Core logic for the Tomate Pomodoro timer: one session that cycles
//! through focus and break segments, survives the app being suspended or
//! killed, and drives reminders and cues at segment boundaries.
//!
//! ## Architecture
//!
//! - **Session Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Recovery**: Bounded fast-forward of a persisted session at startup
//! - **Gateways**: Fire-and-forget traits for persistence, reminders and cues
//! - **Storage**: SQLite key-value snapshot storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core session state machine
//! - [`Settings`]: Validated durations and long break cadence
//! - [`Snapshot`]: The persisted session record
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod gateway;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::{Event, SessionObserver};
pub use gateway::{Feedback, Notifier, ReminderKind, SnapshotStore};
pub use storage::{Config, Database, MemorySnapshotStore, Snapshot, SqliteSnapshotStore};
pub use timer::{
    Clock, Durations, ManualClock, Mode, Segment, SessionEngine, SessionOptions, SessionState,
    SessionView, Settings, SettingsPatch, SystemClock,
};
