//! Ordered listener registry.
//!
//! A [`Subject`] holds subscriber callbacks invoked in registration order.
//! Each invocation is isolated: a panicking listener does not prevent
//! delivery to the rest. `subscribe` returns a [`Subscription`] token;
//! releasing it (explicitly or by drop) deregisters the listener.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

/// An observable event source with ordered, failure-isolated delivery.
pub struct Subject<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register a listener. Delivery order is registration order.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let mut reg = lock(&self.inner);
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.push((id, Arc::new(handler)));
        drop(reg);

        let weak = Arc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).handlers.retain(|(hid, _)| *hid != id);
                }
            })),
        }
    }

    /// Deliver `value` to every listener.
    pub fn emit(&self, value: &T) {
        // Snapshot so listeners may subscribe/unsubscribe reentrantly.
        let handlers: Vec<Handler<T>> = lock(&self.inner)
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(value))).is_err() {
                tracing::warn!("listener panicked during emit");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).handlers.len()
    }
}

impl<T: 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(inner: &Arc<Mutex<Registry<T>>>) -> MutexGuard<'_, Registry<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Release token for a registered listener.
///
/// Dropping the token deregisters the listener; hold it for as long as
/// deliveries are wanted.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Deregister now instead of at drop.
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
