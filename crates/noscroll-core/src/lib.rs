//! # NoScroll Core Library
//!
//! This library provides the core business logic for NoScroll, an app that
//! gates access to distracting applications behind a daily quota of chess
//! puzzles. All operations are available through this library; any shell
//! (CLI, mobile, desktop) is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Focus gate**: a scheduler that evaluates, on a recurring tick and on
//!   counter-change events, whether "now" is inside the configured focus
//!   window with the daily quota unmet, and dispatches reminders
//! - **Storage**: SQLite-backed key/value persistence for preferences and
//!   daily completion counts
//! - **Puzzles**: paged read-only access to the remote puzzle tables plus
//!   an in-process cache
//!
//! ## Key Components
//!
//! - [`FocusGateScheduler`]: the reminder orchestrator (requires a Tokio
//!   runtime)
//! - [`DailyCounter`]: per-day puzzle completion counts with change events
//! - [`Preferences`]: durable user settings
//! - [`ReminderDispatcher`]: boundary to the platform notification facility

pub mod error;
pub mod gate;
pub mod notify;
pub mod observer;
pub mod puzzles;
pub mod storage;

pub use error::{CoreError, StoreError};
pub use gate::{
    decide, is_within_window, FocusGateScheduler, GateConfig, GateDecision, LifecycleState,
    Trigger,
};
pub use notify::{ChannelImportance, DispatchOutcome, ReminderChannel, ReminderDispatcher};
pub use observer::{Subject, Subscription};
pub use puzzles::{PuzzleCache, PuzzleClient, PuzzleFeed, PuzzleRecord};
pub use storage::{CountChange, DailyCounter, Preferences, Store, ThemeSpec};
