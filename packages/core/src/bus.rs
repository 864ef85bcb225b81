//! Process-wide fan-out point for inbound events.
//!
//! Dispatch is synchronous: `publish` invokes every registered listener, in
//! registration order, before returning. Listeners must not block.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::{AppEvent, DecodeError};

type Callback = dyn Fn(&AppEvent) + Send + Sync;

struct Listener {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Box<Callback>,
}

#[derive(Default)]
struct BusInner {
    listeners: Mutex<Vec<Arc<Listener>>>,
    next_id: AtomicU64,
}

/// Event bus handle. Clones share the same listener set.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventBus {
    /// Create a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every subsequent event.
    ///
    /// The listener stays registered until the returned subscription is
    /// unsubscribed or dropped.
    pub fn listen<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        self.inner.listeners.lock().push(Arc::new(Listener {
            id,
            active: active.clone(),
            callback: Box::new(callback),
        }));
        tracing::trace!(listener = id, "bus listener registered");

        Subscription {
            id,
            active,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every active listener.
    pub fn publish(&self, event: &AppEvent) {
        // Snapshot so callbacks may listen or unsubscribe without holding the lock.
        let snapshot: Vec<Arc<Listener>> = self.inner.listeners.lock().clone();
        tracing::debug!(listeners = snapshot.len(), "{}", event.description());
        for listener in snapshot {
            if listener.active.load(Ordering::Acquire) {
                (listener.callback)(event);
            }
        }
    }

    /// Decode one JSON frame and publish it.
    pub fn publish_frame(&self, frame: &str) -> Result<AppEvent, DecodeError> {
        let event = AppEvent::from_frame(frame)?;
        self.publish(&event);
        Ok(event)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

/// Registration returned by [`EventBus::listen`].
///
/// Unsubscribing is idempotent and may happen from inside the listener's own
/// callback. Dropping the subscription unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Remove the listener from the bus.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(inner) = self.bus.upgrade() {
            let removed = {
                let mut listeners = inner.listeners.lock();
                listeners
                    .iter()
                    .position(|l| l.id == self.id)
                    .map(|index| listeners.remove(index))
            };
            // The callback may own other subscriptions; release it outside the lock.
            drop(removed);
            tracing::trace!(listener = self.id, "bus listener removed");
        }
    }

    /// Check if the listener still receives events.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
