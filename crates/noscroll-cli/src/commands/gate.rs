use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use noscroll_core::gate::{decide, FocusGateScheduler, GateConfig};
use noscroll_core::notify::{DispatchOutcome, ReminderChannel, ReminderDispatcher};
use noscroll_core::storage::{DailyCounter, Preferences, Store};

#[derive(Subcommand)]
pub enum GateAction {
    /// Print the gate decision for "now" as JSON
    Status,
    /// Run the reminder scheduler in the foreground until ctrl-c
    Run {
        /// Seconds between periodic evaluations
        #[arg(long, default_value = "600")]
        interval_secs: u64,
    },
}

/// Console-backed dispatcher for foreground runs. Permission is always
/// granted; reminders print to stdout.
struct ConsoleDispatcher {
    channel: ReminderChannel,
}

impl ReminderDispatcher for ConsoleDispatcher {
    fn ensure_permission(&self) -> bool {
        true
    }

    fn dispatch(
        &self,
        title: &str,
        body: &str,
    ) -> Result<DispatchOutcome, Box<dyn std::error::Error>> {
        println!("[{}] {title}: {body}", self.channel.id);
        Ok(DispatchOutcome {
            id: uuid::Uuid::new_v4().to_string(),
        })
    }
}

pub fn run(action: GateAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GateAction::Status => {
            let store = Store::open()?;
            let prefs = Preferences::load(&store);
            let counter = DailyCounter::new(Arc::new(store));
            let completed = counter.completed_on(&DailyCounter::today_key());
            let decision = decide(&prefs, completed, chrono::Local::now().naive_local());
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(())
        }
        GateAction::Run { interval_secs } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async move {
                let store = Arc::new(Store::open()?);
                let counter = Arc::new(DailyCounter::new(store.clone()));
                let dispatcher = Arc::new(ConsoleDispatcher {
                    channel: ReminderChannel::default(),
                });
                let config = GateConfig {
                    tick_interval: Duration::from_secs(interval_secs.max(1)),
                };
                let gate = FocusGateScheduler::new(store, counter, dispatcher, config);
                if !gate.start() {
                    eprintln!("gate not armed (notification permission missing)");
                }

                tokio::signal::ctrl_c().await?;
                gate.shutdown();
                Ok::<(), Box<dyn std::error::Error>>(())
            })
        }
    }
}
