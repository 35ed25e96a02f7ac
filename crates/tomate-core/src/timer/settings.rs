//! Validated timer settings.
//!
//! Values are never rejected: every write rounds to the nearest whole
//! number and clamps into range, and absent fields keep their previous
//! value.

use serde::{Deserialize, Serialize};

pub const FOCUS_MINUTES: (u32, u32) = (1, 90);
pub const SHORT_BREAK_MINUTES: (u32, u32) = (1, 30);
pub const LONG_BREAK_MINUTES: (u32, u32) = (1, 60);
pub const MIN_LONG_BREAK_EVERY: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Completed focus segments between long breaks.
    pub long_break_every: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_every: 4,
        }
    }
}

/// A partial settings update. Fields are raw numbers straight from the
/// user and may be fractional or out of range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub focus_minutes: Option<f64>,
    #[serde(default)]
    pub short_break_minutes: Option<f64>,
    #[serde(default)]
    pub long_break_minutes: Option<f64>,
    #[serde(default)]
    pub long_break_every: Option<f64>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.focus_minutes.is_none()
            && self.short_break_minutes.is_none()
            && self.long_break_minutes.is_none()
            && self.long_break_every.is_none()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(s: Settings) -> Self {
        Self {
            focus_minutes: Some(f64::from(s.focus_minutes)),
            short_break_minutes: Some(f64::from(s.short_break_minutes)),
            long_break_minutes: Some(f64::from(s.long_break_minutes)),
            long_break_every: Some(f64::from(s.long_break_every)),
        }
    }
}

impl Settings {
    /// Apply `patch` on top of `self`, producing a valid value.
    pub fn sanitize(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            focus_minutes: clamp_field(patch.focus_minutes, self.focus_minutes, FOCUS_MINUTES),
            short_break_minutes: clamp_field(
                patch.short_break_minutes,
                self.short_break_minutes,
                SHORT_BREAK_MINUTES,
            ),
            long_break_minutes: clamp_field(
                patch.long_break_minutes,
                self.long_break_minutes,
                LONG_BREAK_MINUTES,
            ),
            long_break_every: clamp_field(
                patch.long_break_every,
                self.long_break_every,
                (MIN_LONG_BREAK_EVERY, u32::MAX),
            ),
        }
    }

    /// Re-validate an already constructed value (e.g. one read from disk).
    pub fn sanitized(&self) -> Settings {
        Settings::default().sanitize(&SettingsPatch::from(*self))
    }
}

/// Round then clamp. NaN counts as absent.
fn clamp_field(value: Option<f64>, previous: u32, (min, max): (u32, u32)) -> u32 {
    match value {
        Some(v) if !v.is_nan() => {
            let rounded = v.round().clamp(f64::from(min), f64::from(max));
            // In range after the clamp, so the cast cannot truncate.
            rounded as u32
        }
        _ => previous.clamp(min, max),
    }
}
