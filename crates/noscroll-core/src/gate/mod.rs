//! Focus gate: decision model, window evaluation, scheduler.

pub mod scheduler;
pub mod window;

pub use scheduler::{FocusGateScheduler, GateConfig, LifecycleState, Trigger};
pub use window::is_within_window;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::storage::Preferences;

/// Outcome of a single gate evaluation. Recomputed on every wake, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub in_window: bool,
    pub completed_today: u32,
    pub remaining: u32,
    pub should_notify: bool,
}

/// Judge whether a reminder is due at `now`.
pub fn decide(prefs: &Preferences, completed_today: u32, now: NaiveDateTime) -> GateDecision {
    let in_window = is_within_window(
        now,
        prefs.window_start.as_deref(),
        prefs.window_end.as_deref(),
    );
    let remaining = prefs.puzzle_target.saturating_sub(completed_today);
    GateDecision {
        in_window,
        completed_today,
        remaining,
        should_notify: in_window && remaining > 0,
    }
}
