pub mod counts;
pub mod preferences;
mod store;

pub use counts::{CountChange, DailyCounter};
pub use preferences::{Preferences, ThemeSpec};
pub use store::Store;

use std::path::PathBuf;

/// Returns `~/.config/noscroll[-dev]/` based on NOSCROLL_ENV.
///
/// Set NOSCROLL_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NOSCROLL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("noscroll-dev")
    } else {
        base_dir.join("noscroll")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
