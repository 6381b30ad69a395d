//! Puzzle feeds: records, remote client, and the in-process cache.

pub mod client;

pub use client::PuzzleClient;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::observer::{Subject, Subscription};
use crate::storage::preferences::keys;
use crate::storage::Store;

/// Default page size when filling a feed.
pub const PAGE_SIZE: u32 = 10;

/// One puzzle as served by the data collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub id: i64,
    pub fen: String,
    pub turn_text: String,
    pub prompt_text: String,
    pub correct_move: Option<String>,
}

/// The two puzzle feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleFeed {
    Trending,
    Practice,
}

impl PuzzleFeed {
    /// Remote table backing this feed.
    pub fn table(self) -> &'static str {
        match self {
            PuzzleFeed::Trending => "TrendingPuzzles",
            PuzzleFeed::Practice => "PracticePuzzles",
        }
    }

    fn cursor_key(self) -> &'static str {
        match self {
            PuzzleFeed::Trending => keys::LATEST_TRENDING_ID,
            PuzzleFeed::Practice => keys::LATEST_PRACTICE_ID,
        }
    }
}

#[derive(Default)]
struct Feeds {
    trending: Vec<PuzzleRecord>,
    practice: Vec<PuzzleRecord>,
}

/// In-process cache over the puzzle client.
///
/// Population is an explicit [`init`](Self::init) at process start, not a
/// load-time side effect. Consumers read snapshots and may subscribe to
/// refresh events instead of watching shared mutable state.
pub struct PuzzleCache {
    client: PuzzleClient,
    store: Arc<Store>,
    feeds: Mutex<Feeds>,
    refreshed: Subject<PuzzleFeed>,
}

impl PuzzleCache {
    pub fn new(client: PuzzleClient, store: Arc<Store>) -> Self {
        Self {
            client,
            store,
            feeds: Mutex::new(Feeds::default()),
            refreshed: Subject::new(),
        }
    }

    pub fn client(&self) -> &PuzzleClient {
        &self.client
    }

    /// Persisted last-seen id for `feed`.
    pub fn cursor(&self, feed: PuzzleFeed) -> Option<i64> {
        self.store
            .get(feed.cursor_key())
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
    }

    /// Persist the last-seen id for `feed`. Fails soft.
    pub fn advance_cursor(&self, feed: PuzzleFeed, id: i64) {
        if let Err(e) = self.store.set(feed.cursor_key(), &id.to_string()) {
            tracing::warn!(?feed, error = %e, "cursor write dropped");
        }
    }

    /// Initial population: fetch both feeds once, resuming from the
    /// persisted cursors.
    pub async fn init(&self) {
        self.refresh(
            self.cursor(PuzzleFeed::Trending),
            self.cursor(PuzzleFeed::Practice),
        )
        .await;
    }

    /// Refetch both feeds with explicit cursors and notify subscribers.
    /// A failed fetch leaves that feed empty rather than erroring.
    pub async fn refresh(&self, after_trending: Option<i64>, after_practice: Option<i64>) {
        let trending = self
            .client
            .fetch_page(PuzzleFeed::Trending.table(), PAGE_SIZE, after_trending)
            .await;
        let practice = self
            .client
            .fetch_page(PuzzleFeed::Practice.table(), PAGE_SIZE, after_practice)
            .await;
        {
            let mut feeds = lock(&self.feeds);
            feeds.trending = trending;
            feeds.practice = practice;
        }
        self.refreshed.emit(&PuzzleFeed::Trending);
        self.refreshed.emit(&PuzzleFeed::Practice);
    }

    /// Snapshot of a feed's current records.
    pub fn puzzles(&self, feed: PuzzleFeed) -> Vec<PuzzleRecord> {
        let feeds = lock(&self.feeds);
        match feed {
            PuzzleFeed::Trending => feeds.trending.clone(),
            PuzzleFeed::Practice => feeds.practice.clone(),
        }
    }

    /// Subscribe to refresh events.
    pub fn on_refreshed(
        &self,
        handler: impl Fn(&PuzzleFeed) + Send + Sync + 'static,
    ) -> Subscription {
        self.refreshed.subscribe(handler)
    }
}

fn lock(feeds: &Mutex<Feeds>) -> MutexGuard<'_, Feeds> {
    feeds.lock().unwrap_or_else(PoisonError::into_inner)
}
