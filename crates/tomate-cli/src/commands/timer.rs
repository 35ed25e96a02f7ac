use std::time::Duration;

use clap::Subcommand;
use tokio::time::MissedTickBehavior;
use tomate_core::storage::Database;
use tomate_core::{Config, Event, SessionEngine, SessionOptions, SettingsPatch, SqliteSnapshotStore};

use crate::gateways::{TerminalFeedback, TerminalNotifier};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or continue) the current segment
    Start,
    /// Pause the running segment
    Pause,
    /// Resume a paused segment
    Resume,
    /// Reset to an idle focus segment and forget the saved session
    Reset,
    /// End the current break early and start focusing
    SkipBreak,
    /// Print current session state as JSON
    Status,
    /// Follow the running session, ticking once a second
    Watch,
    /// Change durations (minutes) or the long break cadence
    Settings {
        /// Focus minutes (1-90)
        #[arg(long)]
        focus: Option<f64>,
        /// Short break minutes (1-30)
        #[arg(long)]
        short_break: Option<f64>,
        /// Long break minutes (1-60)
        #[arg(long)]
        long_break: Option<f64>,
        /// Focus segments between long breaks
        #[arg(long)]
        every: Option<f64>,
    },
}

fn open_engine(config: &Config) -> Result<SessionEngine, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let options = SessionOptions {
        settings: config.settings(),
        auto_start: config.auto_start,
        dev_durations: config.dev_durations,
    };
    let mut engine = SessionEngine::new(options)
        .with_store(Box::new(SqliteSnapshotStore::new(db)))
        .with_notifier(Box::new(TerminalNotifier::new(config.notifications.enabled)))
        .with_feedback(Box::new(TerminalFeedback::new(
            config.feedback.sound,
            config.feedback.haptics,
        )));
    if let Some(restored) = engine.restore() {
        tracing::info!("{}", serde_json::to_string(&restored)?);
    }
    Ok(engine)
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

async fn watch(engine: &mut SessionEngine) -> Result<(), Box<dyn std::error::Error>> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while engine.is_running() {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(event) = engine.tick() {
                    eprintln!();
                    print_event(&event)?;
                }
                let view = engine.view();
                eprint!("\r{:<12} {}", view.label, view.clock());
            }
            _ = &mut ctrl_c => break,
        }
    }
    eprintln!();
    Ok(())
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut engine = open_engine(&config)?;

    // Catch up on a boundary that passed since the last invocation.
    if let Some(event) = engine.tick() {
        print_event(&event)?;
    }

    let event = match action {
        TimerAction::Start => engine.start(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Resume => engine.resume(),
        TimerAction::Reset => engine.reset(),
        TimerAction::SkipBreak => engine.skip_break(),
        TimerAction::Status => None,
        TimerAction::Watch => {
            watch(&mut engine).await?;
            None
        }
        TimerAction::Settings {
            focus,
            short_break,
            long_break,
            every,
        } => {
            let patch = SettingsPatch {
                focus_minutes: focus,
                short_break_minutes: short_break,
                long_break_minutes: long_break,
                long_break_every: every,
            };
            if patch.is_empty() {
                None
            } else {
                engine.update_settings(&patch)
            }
        }
    };

    match event {
        Some(event) => print_event(&event)?,
        None => print_event(&engine.snapshot())?,
    }
    Ok(())
}
