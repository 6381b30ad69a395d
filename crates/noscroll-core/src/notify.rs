//! Reminder dispatch boundary.
//!
//! The platform notification facility sits behind [`ReminderDispatcher`].
//! Permission state is a boolean outcome, never an error; dispatch
//! failures are non-fatal to callers. Delivery is best-effort with no
//! retry.

use serde::{Deserialize, Serialize};

/// Relative importance of the reminder channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelImportance {
    Low,
    Default,
    High,
}

/// One-time platform channel configuration, applied before the first
/// dispatch on platforms that require a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderChannel {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
    pub lockscreen_visible: bool,
    /// Delay/on pairs in milliseconds.
    pub vibration_pattern: Vec<u32>,
    pub light_color: String,
}

impl Default for ReminderChannel {
    fn default() -> Self {
        Self {
            id: "no-scroll-reminders".into(),
            name: "No-Scroll Reminders".into(),
            importance: ChannelImportance::Default,
            lockscreen_visible: true,
            vibration_pattern: vec![0, 100, 100],
            light_color: "#739552".into(),
        }
    }
}

/// Receipt for a submitted reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub id: String,
}

/// Boundary to the platform notification facility.
pub trait ReminderDispatcher: Send + Sync {
    /// Check permission; request it once when missing. A failed request
    /// cycle reads as "not granted".
    fn ensure_permission(&self) -> bool;

    /// Submit an immediate, fire-now reminder.
    ///
    /// # Errors
    /// Returns an error when the platform rejects the request; callers
    /// treat this as non-fatal.
    fn dispatch(
        &self,
        title: &str,
        body: &str,
    ) -> Result<DispatchOutcome, Box<dyn std::error::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_channel_matches_platform_setup() {
        let channel = ReminderChannel::default();
        assert_eq!(channel.id, "no-scroll-reminders");
        assert_eq!(channel.importance, ChannelImportance::Default);
        assert!(channel.lockscreen_visible);
        assert_eq!(channel.vibration_pattern, vec![0, 100, 100]);
    }
}
