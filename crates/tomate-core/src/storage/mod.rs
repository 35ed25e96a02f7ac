mod config;
pub mod database;
mod snapshot;
mod snapshot_store;

pub use config::{Config, FeedbackConfig, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use snapshot::{Snapshot, SnapshotSettings};
pub use snapshot_store::{MemorySnapshotStore, SqliteSnapshotStore, SNAPSHOT_KEY};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/tomate[-dev]/` based on TOMATE_ENV.
///
/// Set TOMATE_ENV=dev to use the development data directory, or
/// TOMATE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TOMATE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TOMATE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomate-dev")
            } else {
                base_dir.join("tomate")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
