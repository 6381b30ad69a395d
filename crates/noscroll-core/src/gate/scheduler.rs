//! Focus gate scheduler.
//!
//! The orchestrator behind the reminder feature. Two macro-states: Armed
//! (interval task running) and Disarmed (app backgrounded, no timer).
//! Three wake sources feed the same evaluation: the periodic tick, a
//! lifecycle activation, and a counter-change event.
//!
//! ## Usage
//!
//! ```ignore
//! let gate = FocusGateScheduler::new(store, counter, dispatcher, GateConfig::default());
//! gate.start();                                  // process start
//! gate.on_lifecycle_change(LifecycleState::Background);
//! gate.on_lifecycle_change(LifecycleState::Active);
//! gate.shutdown();                               // releases timer + subscription
//! ```
//!
//! All spawning methods must run inside a Tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Local, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::notify::ReminderDispatcher;
use crate::observer::Subscription;
use crate::storage::{DailyCounter, Preferences, Store};

use super::{decide, GateDecision};

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Interval between periodic evaluations. Also the width of the
    /// duplicate-suppression slot.
    pub tick_interval: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(10 * 60),
        }
    }
}

/// App lifecycle signal, as reported by the embedding shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Background,
}

/// What woke an evaluation. Selects the reminder copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Tick,
    CountChanged,
}

impl Trigger {
    fn title(self) -> &'static str {
        match self {
            Trigger::Tick => "Finish your puzzles first",
            Trigger::CountChanged => "One more puzzle",
        }
    }

    fn body(self, remaining: u32) -> String {
        match self {
            Trigger::Tick => {
                format!("{remaining} to go before scrolling. Keep the streak alive!")
            }
            Trigger::CountChanged => {
                format!("{remaining} left to hit your goal. You've got this!")
            }
        }
    }
}

struct TimerHandle {
    stop_tx: watch::Sender<bool>,
    _task: JoinHandle<()>,
}

struct CountPump {
    _subscription: Subscription,
    _task: JoinHandle<()>,
}

/// Marker preventing duplicate sends within the same tick window.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FiredMarker {
    date: String,
    slot: u64,
}

/// Orchestrates reminder evaluation against the persisted state.
pub struct FocusGateScheduler {
    store: Arc<Store>,
    counter: Arc<DailyCounter>,
    dispatcher: Arc<dyn ReminderDispatcher>,
    config: GateConfig,
    timer: Mutex<Option<TimerHandle>>,
    pump: Mutex<Option<CountPump>>,
    last_fired: Mutex<Option<FiredMarker>>,
}

impl FocusGateScheduler {
    pub fn new(
        store: Arc<Store>,
        counter: Arc<DailyCounter>,
        dispatcher: Arc<dyn ReminderDispatcher>,
        config: GateConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            counter,
            dispatcher,
            config,
            timer: Mutex::new(None),
            pump: Mutex::new(None),
            last_fired: Mutex::new(None),
        })
    }

    /// Process-start activation: wire the counter-change pump, then try to
    /// arm. Returns whether the periodic timer is running.
    pub fn start(self: &Arc<Self>) -> bool {
        self.spawn_pump();
        self.arm()
    }

    /// Arm the periodic timer. Idempotent; stays inert while notification
    /// permission is missing (a later call retries). Returns whether armed.
    pub fn arm(self: &Arc<Self>) -> bool {
        let mut timer = lock(&self.timer);
        if timer.is_some() {
            return true;
        }
        if !self.dispatcher.ensure_permission() {
            tracing::info!("notification permission not granted; gate stays disarmed");
            return false;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let weak = Arc::downgrade(self);
        let period = self.config.tick_interval;
        let task = tokio::spawn(async move {
            // First tick one full interval after arming.
            let start = tokio::time::Instant::now() + period;
            let mut ticks = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        let Some(gate) = weak.upgrade() else { break };
                        gate.evaluate_and_maybe_notify(Trigger::Tick);
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });
        *timer = Some(TimerHandle {
            stop_tx,
            _task: task,
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "gate armed");
        true
    }

    /// Cancel the periodic timer. Safe when already disarmed; an in-flight
    /// evaluation completes.
    pub fn disarm(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            let _ = timer.stop_tx.send(true);
            tracing::debug!("gate disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        lock(&self.timer).is_some()
    }

    /// Lifecycle transition from the embedding shell.
    pub fn on_lifecycle_change(self: &Arc<Self>, state: LifecycleState) {
        match state {
            LifecycleState::Active => {
                self.arm();
            }
            LifecycleState::Background => self.disarm(),
        }
    }

    /// Release the timer, the counter pump, and its subscription.
    pub fn shutdown(&self) {
        self.disarm();
        if let Some(pump) = lock(&self.pump).take() {
            // Dropping the subscription drops the pump's sender, which
            // ends the pump task.
            drop(pump);
        }
    }

    /// Run one evaluation and dispatch when due. Shared by every trigger
    /// path; dispatch failures are swallowed.
    pub fn evaluate_and_maybe_notify(&self, trigger: Trigger) -> GateDecision {
        let prefs = Preferences::load(&self.store);
        let today = DailyCounter::today_key();
        let completed = self.counter.completed_on(&today);
        let decision = decide(&prefs, completed, Local::now().naive_local());
        tracing::debug!(?trigger, ?decision, "gate evaluation");

        if !decision.should_notify {
            return decision;
        }
        if self.already_fired_this_slot(&today) {
            tracing::debug!("reminder suppressed; already fired this tick window");
            return decision;
        }

        let body = trigger.body(decision.remaining);
        match self.dispatcher.dispatch(trigger.title(), &body) {
            Ok(outcome) => tracing::debug!(id = %outcome.id, "reminder dispatched"),
            Err(e) => tracing::warn!(error = %e, "reminder dispatch failed"),
        }
        decision
    }

    /// Check-and-set the `(date, slot)` marker. The slot index advances
    /// once per tick interval, so at most one send happens per window.
    fn already_fired_this_slot(&self, today: &str) -> bool {
        let interval_ms = self.config.tick_interval.as_millis().max(1) as u64;
        let slot = (Utc::now().timestamp_millis().max(0) as u64) / interval_ms;
        let marker = FiredMarker {
            date: today.to_string(),
            slot,
        };
        let mut last = lock(&self.last_fired);
        if last.as_ref() == Some(&marker) {
            return true;
        }
        *last = Some(marker);
        false
    }

    fn spawn_pump(self: &Arc<Self>) {
        let mut pump = lock(&self.pump);
        if pump.is_some() {
            return;
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let subscription = self.counter.on_count_changed(move |_| {
            let _ = tx.send(());
        });
        let weak = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let Some(gate) = weak.upgrade() else { break };
                gate.evaluate_and_maybe_notify(Trigger::CountChanged);
            }
        });
        *pump = Some(CountPump {
            _subscription: subscription,
            _task: task,
        });
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
