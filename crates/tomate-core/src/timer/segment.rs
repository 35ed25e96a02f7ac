use serde::{Deserialize, Serialize};

use super::settings::Settings;

/// A stretch of wall-clock time the session is spending on one thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Segment {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Segment {
    pub fn label(self) -> &'static str {
        match self {
            Segment::Focus => "Focus",
            Segment::ShortBreak => "Short Break",
            Segment::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Segment::Focus)
    }
}

/// Externally observed status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Never started since the last reset.
    Idle,
    Focus,
    ShortBreak,
    LongBreak,
    /// Suspended by the user mid-segment.
    Paused,
}

impl Mode {
    /// The segment this mode names directly, if any.
    pub fn segment(self) -> Option<Segment> {
        match self {
            Mode::Focus => Some(Segment::Focus),
            Mode::ShortBreak => Some(Segment::ShortBreak),
            Mode::LongBreak => Some(Segment::LongBreak),
            Mode::Idle | Mode::Paused => None,
        }
    }
}

impl From<Segment> for Mode {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Focus => Mode::Focus,
            Segment::ShortBreak => Mode::ShortBreak,
            Segment::LongBreak => Mode::LongBreak,
        }
    }
}

/// Segment lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Durations {
    pub focus: u64,
    pub short_break: u64,
    pub long_break: u64,
}

impl Durations {
    /// Short durations for exercising transitions by hand.
    pub const DEV: Durations = Durations {
        focus: 5,
        short_break: 3,
        long_break: 5,
    };

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            focus: u64::from(settings.focus_minutes).saturating_mul(60),
            short_break: u64::from(settings.short_break_minutes).saturating_mul(60),
            long_break: u64::from(settings.long_break_minutes).saturating_mul(60),
        }
    }

    pub fn of(&self, segment: Segment) -> u64 {
        match segment {
            Segment::Focus => self.focus,
            Segment::ShortBreak => self.short_break,
            Segment::LongBreak => self.long_break,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Which segment follows `finished`, given the focus count *after* any
/// increment for the finished segment.
pub fn next_segment(finished: Segment, pomodoros_completed: u32, long_break_every: u32) -> Segment {
    match finished {
        Segment::Focus => {
            if pomodoros_completed % long_break_every.max(1) == 0 {
                Segment::LongBreak
            } else {
                Segment::ShortBreak
            }
        }
        Segment::ShortBreak | Segment::LongBreak => Segment::Focus,
    }
}
