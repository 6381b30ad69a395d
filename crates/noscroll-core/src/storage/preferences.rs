//! User preferences over the kv store.
//!
//! Every value lives under a fixed string key. Load and save both fail
//! soft: a read problem produces the documented defaults, a write problem
//! drops the write. Settings UIs never see persistence errors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Store;

/// Fixed kv keys for persisted state.
pub mod keys {
    pub const BLOCKED_APPS: &str = "blocked-apps";
    pub const PUZZLE_TARGET: &str = "puzzle-target";
    pub const WINDOW_START: &str = "window-start";
    pub const WINDOW_END: &str = "window-end";
    pub const THEME_PRIMARY: &str = "theme-primary";
    pub const THEME_SECONDARY: &str = "theme-secondary";
    pub const THEME_KEY: &str = "theme-key";
    pub const DAILY_COUNTS: &str = "daily-puzzle-counts";
    pub const LATEST_TRENDING_ID: &str = "latest-trending-id";
    pub const LATEST_PRACTICE_ID: &str = "latest-practice-id";
}

pub const DEFAULT_PUZZLE_TARGET: u32 = 5;

/// Color theme selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSpec {
    pub key: String,
    pub primary: String,
    pub secondary: String,
}

/// User settings backing every gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Apps the user wants gated behind the daily quota.
    pub blocked_apps: BTreeSet<String>,
    /// Puzzles to complete per day before blocked apps are earned back.
    /// Always >= 1.
    pub puzzle_target: u32,
    /// Focus window bounds, 24-hour `HH:mm`. Absent means no window is
    /// configured and reminders never fire.
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub theme: Option<ThemeSpec>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            blocked_apps: BTreeSet::new(),
            puzzle_target: DEFAULT_PUZZLE_TARGET,
            window_start: None,
            window_end: None,
            theme: None,
        }
    }
}

impl Preferences {
    /// Load from the store, substituting defaults for anything missing or
    /// unreadable.
    pub fn load(store: &Store) -> Self {
        let blocked_apps = store
            .get(keys::BLOCKED_APPS)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        // A stored target that fails to parse or violates the >= 1
        // invariant reads back as the default.
        let puzzle_target = store
            .get(keys::PUZZLE_TARGET)
            .ok()
            .flatten()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|t| *t >= 1)
            .unwrap_or(DEFAULT_PUZZLE_TARGET);

        let window_start = read_opt(store, keys::WINDOW_START);
        let window_end = read_opt(store, keys::WINDOW_END);

        // A theme exists only when both colors are present.
        let primary = read_opt(store, keys::THEME_PRIMARY);
        let secondary = read_opt(store, keys::THEME_SECONDARY);
        let theme = match (primary, secondary) {
            (Some(primary), Some(secondary)) => Some(ThemeSpec {
                key: read_opt(store, keys::THEME_KEY).unwrap_or_else(|| "classic".into()),
                primary,
                secondary,
            }),
            _ => None,
        };

        Self {
            blocked_apps,
            puzzle_target,
            window_start,
            window_end,
            theme,
        }
    }

    /// Persist to the store. Write failures are logged and dropped.
    pub fn save(&self, store: &Store) {
        let blocked = serde_json::to_string(&self.blocked_apps).unwrap_or_else(|_| "[]".into());
        write_soft(store, keys::BLOCKED_APPS, &blocked);
        write_soft(store, keys::PUZZLE_TARGET, &self.puzzle_target.to_string());

        match &self.window_start {
            Some(start) => write_soft(store, keys::WINDOW_START, start),
            None => delete_soft(store, keys::WINDOW_START),
        }
        match &self.window_end {
            Some(end) => write_soft(store, keys::WINDOW_END, end),
            None => delete_soft(store, keys::WINDOW_END),
        }

        if let Some(theme) = &self.theme {
            write_soft(store, keys::THEME_PRIMARY, &theme.primary);
            write_soft(store, keys::THEME_SECONDARY, &theme.secondary);
            let key = if theme.key.is_empty() {
                "custom"
            } else {
                theme.key.as_str()
            };
            write_soft(store, keys::THEME_KEY, key);
        }
    }
}

fn read_opt(store: &Store, key: &str) -> Option<String> {
    store.get(key).ok().flatten().filter(|s| !s.is_empty())
}

fn write_soft(store: &Store, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "preference write dropped");
    }
}

fn delete_soft(store: &Store, key: &str) {
    if let Err(e) = store.delete(key) {
        tracing::warn!(key, error = %e, "preference delete dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_defaults() {
        let store = Store::open_memory().unwrap();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.puzzle_target, 5);
        assert!(prefs.blocked_apps.is_empty());
        assert!(prefs.window_start.is_none());
        assert!(prefs.theme.is_none());
    }

    #[test]
    fn save_load_roundtrip() {
        let store = Store::open_memory().unwrap();
        let mut prefs = Preferences::default();
        prefs.puzzle_target = 8;
        prefs.blocked_apps.insert("com.example.feed".into());
        prefs.blocked_apps.insert("com.example.clips".into());
        prefs.window_start = Some("22:00".into());
        prefs.window_end = Some("06:00".into());
        prefs.theme = Some(ThemeSpec {
            key: "forest".into(),
            primary: "#739552".into(),
            secondary: "#ebecd0".into(),
        });

        prefs.save(&store);
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn invalid_target_reads_as_default() {
        let store = Store::open_memory().unwrap();
        store.set(keys::PUZZLE_TARGET, "0").unwrap();
        assert_eq!(Preferences::load(&store).puzzle_target, 5);

        store.set(keys::PUZZLE_TARGET, "not-a-number").unwrap();
        assert_eq!(Preferences::load(&store).puzzle_target, 5);
    }

    #[test]
    fn theme_requires_both_colors() {
        let store = Store::open_memory().unwrap();
        store.set(keys::THEME_PRIMARY, "#739552").unwrap();
        assert!(Preferences::load(&store).theme.is_none());

        store.set(keys::THEME_SECONDARY, "#ebecd0").unwrap();
        let theme = Preferences::load(&store).theme.unwrap();
        assert_eq!(theme.key, "classic"); // no stored key falls back
        assert_eq!(theme.primary, "#739552");
    }

    #[test]
    fn clearing_window_removes_keys() {
        let store = Store::open_memory().unwrap();
        let mut prefs = Preferences::default();
        prefs.window_start = Some("09:00".into());
        prefs.window_end = Some("17:00".into());
        prefs.save(&store);
        assert!(Preferences::load(&store).window_start.is_some());

        prefs.window_start = None;
        prefs.window_end = None;
        prefs.save(&store);
        let loaded = Preferences::load(&store);
        assert!(loaded.window_start.is_none());
        assert!(loaded.window_end.is_none());
    }
}
