use std::sync::Arc;

use clap::Subcommand;
use noscroll_core::puzzles::{PuzzleCache, PuzzleClient, PuzzleFeed, PAGE_SIZE};
use noscroll_core::storage::Store;

#[derive(Subcommand)]
pub enum PuzzlesAction {
    /// Fetch one page of a feed and print it as JSON
    Fetch {
        /// Feed to read: trending or practice
        #[arg(long, default_value = "trending")]
        feed: String,
        #[arg(long, default_value_t = PAGE_SIZE)]
        limit: u32,
        /// Resume after this puzzle id instead of the stored cursor
        #[arg(long)]
        after: Option<i64>,
    },
    /// Refresh both cached feeds from the stored cursors
    Refresh,
    /// Print or advance the stored cursor for a feed
    Cursor {
        #[arg(long, default_value = "trending")]
        feed: String,
        /// Persist this id as the last-seen puzzle
        #[arg(long)]
        advance: Option<i64>,
    },
}

fn client_from_env() -> Result<PuzzleClient, Box<dyn std::error::Error>> {
    let base_url = std::env::var("NOSCROLL_PUZZLES_URL")
        .map_err(|_| "NOSCROLL_PUZZLES_URL is not set")?;
    let api_key = std::env::var("NOSCROLL_PUZZLES_KEY").unwrap_or_default();
    Ok(PuzzleClient::new(base_url, api_key))
}

fn parse_feed(feed: &str) -> Result<PuzzleFeed, Box<dyn std::error::Error>> {
    match feed {
        "trending" => Ok(PuzzleFeed::Trending),
        "practice" => Ok(PuzzleFeed::Practice),
        other => Err(format!("unknown feed: {other}").into()),
    }
}

pub fn run(action: PuzzlesAction) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let store = Arc::new(Store::open()?);
        match action {
            PuzzlesAction::Fetch { feed, limit, after } => {
                let feed = parse_feed(&feed)?;
                let cache = PuzzleCache::new(client_from_env()?, store);
                let after = after.or_else(|| cache.cursor(feed));
                let page = cache.client().fetch_page(feed.table(), limit, after).await;
                println!("{}", serde_json::to_string_pretty(&page)?);
            }
            PuzzlesAction::Refresh => {
                let cache = PuzzleCache::new(client_from_env()?, store);
                cache.init().await;
                for feed in [PuzzleFeed::Trending, PuzzleFeed::Practice] {
                    println!("{}: {} puzzles", feed.table(), cache.puzzles(feed).len());
                }
            }
            PuzzlesAction::Cursor { feed, advance } => {
                let feed = parse_feed(&feed)?;
                // Cursor access needs no remote client.
                let cache = PuzzleCache::new(PuzzleClient::new("http://localhost", ""), store);
                if let Some(id) = advance {
                    cache.advance_cursor(feed, id);
                }
                match cache.cursor(feed) {
                    Some(id) => println!("{id}"),
                    None => println!("none"),
                }
            }
        }
        Ok(())
    })
}
