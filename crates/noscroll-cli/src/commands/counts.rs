use std::sync::Arc;

use clap::Subcommand;
use noscroll_core::storage::{DailyCounter, Store};

#[derive(Subcommand)]
pub enum CountsAction {
    /// Record one completed puzzle for today and print the new count
    Increment,
    /// Print today's completed count
    Today,
    /// Print the full date -> count mapping as JSON
    List,
}

pub fn run(action: CountsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(Store::open()?);
    let counter = DailyCounter::new(store);

    match action {
        CountsAction::Increment => {
            println!("{}", counter.increment_today());
        }
        CountsAction::Today => {
            println!("{}", counter.completed_on(&DailyCounter::today_key()));
        }
        CountsAction::List => {
            println!("{}", serde_json::to_string_pretty(&counter.counts())?);
        }
    }
    Ok(())
}
