//! Daily puzzle-completion counts.
//!
//! A durable mapping from calendar date to puzzles completed that day,
//! with a synchronous change-notification channel. Counts back the streak
//! display and every gate evaluation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::observer::{Subject, Subscription};

use super::preferences::keys;
use super::Store;

/// Payload delivered to count-change listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountChange {
    pub date: String,
    pub count: u32,
}

/// Durable date -> puzzles-completed mapping.
///
/// Stored as a JSON object under a single kv key. Only today's entry is
/// ever incremented by a running session; past dates are retained.
pub struct DailyCounter {
    store: Arc<Store>,
    changes: Subject<CountChange>,
}

impl DailyCounter {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            changes: Subject::new(),
        }
    }

    /// Today's map key (UTC calendar date, `YYYY-MM-DD`).
    pub fn today_key() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    /// The full persisted mapping. Fails soft to an empty map.
    pub fn counts(&self) -> BTreeMap<String, u32> {
        self.store
            .get(keys::DAILY_COUNTS)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Count recorded for `date`, 0 when absent.
    pub fn completed_on(&self, date: &str) -> u32 {
        self.counts().get(date).copied().unwrap_or(0)
    }

    /// Increment today's entry, persist, and synchronously notify
    /// listeners. Returns the new count.
    ///
    /// Listeners are notified even when the write is dropped; the
    /// in-session count is still the freshest value available.
    pub fn increment_today(&self) -> u32 {
        let today = Self::today_key();
        let mut counts = self.counts();
        let count = counts.get(&today).copied().unwrap_or(0) + 1;
        counts.insert(today.clone(), count);

        match serde_json::to_string(&counts) {
            Ok(raw) => {
                if let Err(e) = self.store.set(keys::DAILY_COUNTS, &raw) {
                    tracing::warn!(error = %e, "daily count write dropped");
                }
            }
            Err(e) => tracing::warn!(error = %e, "daily count serialization failed"),
        }

        self.changes.emit(&CountChange {
            date: today,
            count,
        });
        count
    }

    /// Register a count-change listener. Delivery order is registration
    /// order; a panicking listener does not block the rest.
    pub fn on_count_changed(
        &self,
        handler: impl Fn(&CountChange) + Send + Sync + 'static,
    ) -> Subscription {
        self.changes.subscribe(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn counter() -> DailyCounter {
        DailyCounter::new(Arc::new(Store::open_memory().unwrap()))
    }

    #[test]
    fn increments_accumulate_and_notify() {
        let counter = counter();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let _sub = counter.on_count_changed(move |change| {
            seen2.lock().unwrap().push(change.clone());
        });

        assert_eq!(counter.increment_today(), 1);
        assert_eq!(counter.increment_today(), 2);
        assert_eq!(counter.increment_today(), 3);

        let today = DailyCounter::today_key();
        assert_eq!(counter.counts().get(&today), Some(&3));
        assert_eq!(counter.completed_on(&today), 3);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|c| c.date == today));
        assert_eq!(
            seen.iter().map(|c| c.count).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let counter = counter();
        let log = Arc::new(Mutex::new(Vec::new()));
        let (log_a, log_b) = (Arc::clone(&log), Arc::clone(&log));
        let _a = counter.on_count_changed(move |_| log_a.lock().unwrap().push("a"));
        let _b = counter.on_count_changed(move |_| log_b.lock().unwrap().push("b"));

        counter.increment_today();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn panicking_listener_does_not_block_later_listeners() {
        let counter = counter();
        let log = Arc::new(Mutex::new(Vec::new()));
        let log2 = Arc::clone(&log);
        let _bad = counter.on_count_changed(|_| panic!("listener failure"));
        let _good = counter.on_count_changed(move |c| log2.lock().unwrap().push(c.count));

        counter.increment_today();
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let counter = counter();
        let log = Arc::new(Mutex::new(Vec::new()));
        let log2 = Arc::clone(&log);
        let sub = counter.on_count_changed(move |c| log2.lock().unwrap().push(c.count));

        counter.increment_today();
        sub.unsubscribe();
        counter.increment_today();
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn unknown_date_reads_zero() {
        let counter = counter();
        assert_eq!(counter.completed_on("1999-12-31"), 0);
        assert!(counter.counts().is_empty());
    }
}
