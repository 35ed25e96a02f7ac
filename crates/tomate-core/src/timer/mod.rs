mod clock;
mod engine;
mod recovery;
mod segment;
mod settings;
mod state;

pub use clock::{remaining_secs, signed_remaining_secs, Clock, ManualClock, SystemClock};
pub use engine::{SessionEngine, SessionOptions};
pub use recovery::{recover, Recovered, MAX_CATCH_UP_TRANSITIONS};
pub use segment::{next_segment, Durations, Mode, Segment};
pub use settings::{
    Settings, SettingsPatch, FOCUS_MINUTES, LONG_BREAK_MINUTES, MIN_LONG_BREAK_EVERY,
    SHORT_BREAK_MINUTES,
};
pub use state::{SessionState, SessionView};
