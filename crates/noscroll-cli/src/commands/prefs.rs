use chrono::NaiveTime;
use clap::Subcommand;
use noscroll_core::storage::{Preferences, Store, ThemeSpec};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print current preferences as JSON
    Show,
    /// Set the daily puzzle target
    SetTarget {
        /// Puzzles per day, at least 1
        target: u32,
    },
    /// Set the focus window bounds (24-hour HH:mm; end before start means
    /// an overnight window)
    SetWindow { start: String, end: String },
    /// Remove the focus window
    ClearWindow,
    /// Add an app to the blocked set
    Block { app: String },
    /// Remove an app from the blocked set
    Unblock { app: String },
    /// Select a color theme
    SetTheme {
        key: String,
        primary: String,
        secondary: String,
    },
}

fn validate_hhmm(value: &str) -> Result<(), Box<dyn std::error::Error>> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| format!("'{value}' is not a 24-hour HH:mm time").into())
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let mut prefs = Preferences::load(&store);

    match action {
        PrefsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&prefs)?);
            return Ok(());
        }
        PrefsAction::SetTarget { target } => {
            prefs.puzzle_target = target.max(1);
        }
        PrefsAction::SetWindow { start, end } => {
            validate_hhmm(&start)?;
            validate_hhmm(&end)?;
            prefs.window_start = Some(start);
            prefs.window_end = Some(end);
        }
        PrefsAction::ClearWindow => {
            prefs.window_start = None;
            prefs.window_end = None;
        }
        PrefsAction::Block { app } => {
            prefs.blocked_apps.insert(app);
        }
        PrefsAction::Unblock { app } => {
            prefs.blocked_apps.remove(&app);
        }
        PrefsAction::SetTheme {
            key,
            primary,
            secondary,
        } => {
            prefs.theme = Some(ThemeSpec {
                key,
                primary,
                secondary,
            });
        }
    }

    prefs.save(&store);
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(())
}
