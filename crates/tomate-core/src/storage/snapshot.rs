//! Persisted session record.
//!
//! The JSON shape is shared with older app versions, so field names are
//! camelCase and both `settings` and `durations` are tolerated as missing.

use serde::{Deserialize, Serialize};

use crate::timer::{Durations, Mode, Segment, Settings, SettingsPatch};

/// Settings as written in the record (minutes, plus cadence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSettings {
    pub focus_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
    pub long_break_every: u32,
}

impl From<Settings> for SnapshotSettings {
    fn from(s: Settings) -> Self {
        Self {
            focus_min: s.focus_minutes,
            short_break_min: s.short_break_minutes,
            long_break_min: s.long_break_minutes,
            long_break_every: s.long_break_every,
        }
    }
}

impl From<SnapshotSettings> for Settings {
    fn from(s: SnapshotSettings) -> Self {
        Settings {
            focus_minutes: s.focus_min,
            short_break_minutes: s.short_break_min,
            long_break_minutes: s.long_break_min,
            long_break_every: s.long_break_every,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub mode: Mode,
    pub is_running: bool,
    pub current_segment: Segment,
    pub pomodoros_completed: u32,
    #[serde(default)]
    pub end_timestamp_ms: Option<i64>,
    pub remaining_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SnapshotSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations: Option<Durations>,
    #[serde(default)]
    pub updated_at: i64,
}

impl Snapshot {
    /// Settings carried by the record, sanitized.
    ///
    /// Falls back to deriving minutes from `durations`, then to `current`.
    pub fn resolved_settings(&self, current: Settings) -> Settings {
        if let Some(s) = self.settings {
            return Settings::from(s).sanitized();
        }
        match self.durations {
            Some(d) => current.sanitize(&SettingsPatch {
                focus_minutes: Some(d.focus as f64 / 60.0),
                short_break_minutes: Some(d.short_break as f64 / 60.0),
                long_break_minutes: Some(d.long_break as f64 / 60.0),
                long_break_every: None,
            }),
            None => current,
        }
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("discarding malformed session snapshot: {e}");
                None
            }
        }
    }
}
