//! Connection registry
//!
//! Maps every scope to the subscribers currently listening on it. A single
//! lock guards both the per-room and the global maps, so a connection is
//! always either fully registered or absent.

use super::{ConnectionId, Subscriber};
use ama_core::EventScope;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Default)]
struct Subscriptions {
    rooms: HashMap<i64, HashMap<ConnectionId, Subscriber>>,
    global: HashMap<ConnectionId, Subscriber>,
}

impl Subscriptions {
    fn len(&self) -> usize {
        self.global.len() + self.rooms.values().map(HashMap::len).sum::<usize>()
    }
}

/// Registry of live subscriptions, keyed by scope
pub struct ConnectionRegistry {
    inner: RwLock<Subscriptions>,
    next_id: AtomicU64,
    drained: Notify,
}

impl ConnectionRegistry {
    /// Create a new, empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Subscriptions::default()),
            next_id: AtomicU64::new(1),
            drained: Notify::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Allocate an identifier for a new connection
    pub fn next_connection_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a subscriber under a scope.
    ///
    /// The returned guard unregisters it when dropped.
    pub fn subscribe(self: &Arc<Self>, scope: EventScope, subscriber: Subscriber) -> Subscription {
        let id = subscriber.id();
        {
            let mut inner = self.inner.write();
            match scope {
                EventScope::Room(room_id) => {
                    inner.rooms.entry(room_id).or_default().insert(id, subscriber);
                }
                EventScope::Global => {
                    inner.global.insert(id, subscriber);
                }
            }
        }

        tracing::debug!(connection_id = %id, scope = %scope, "Subscriber added");

        Subscription {
            registry: Arc::clone(self),
            scope,
            id,
        }
    }

    /// Remove a subscriber. Removing an absent subscriber is a no-op.
    ///
    /// Returns whether the subscriber was registered.
    pub fn unsubscribe(&self, scope: EventScope, id: ConnectionId) -> bool {
        let (removed, empty) = {
            let mut inner = self.inner.write();
            let removed = match scope {
                EventScope::Room(room_id) => {
                    let removed = inner
                        .rooms
                        .get_mut(&room_id)
                        .and_then(|subscribers| subscribers.remove(&id))
                        .is_some();
                    if inner.rooms.get(&room_id).is_some_and(HashMap::is_empty) {
                        inner.rooms.remove(&room_id);
                    }
                    removed
                }
                EventScope::Global => inner.global.remove(&id).is_some(),
            };
            (removed, inner.len() == 0)
        };

        if removed {
            tracing::debug!(connection_id = %id, scope = %scope, "Subscriber removed");
        }
        if empty {
            self.drained.notify_waiters();
        }

        removed
    }

    /// Copy of the subscribers of a scope at this instant
    pub fn snapshot(&self, scope: EventScope) -> Vec<Subscriber> {
        let inner = self.inner.read();
        match scope {
            EventScope::Room(room_id) => inner
                .rooms
                .get(&room_id)
                .map(|subscribers| subscribers.values().cloned().collect())
                .unwrap_or_default(),
            EventScope::Global => inner.global.values().cloned().collect(),
        }
    }

    /// Number of subscribers on a scope
    pub fn subscriber_count(&self, scope: EventScope) -> usize {
        let inner = self.inner.read();
        match scope {
            EventScope::Room(room_id) => inner.rooms.get(&room_id).map_or(0, HashMap::len),
            EventScope::Global => inner.global.len(),
        }
    }

    /// Total number of registered connections
    pub fn connection_count(&self) -> usize {
        self.inner.read().len()
    }

    /// Number of rooms with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.inner.read().rooms.len()
    }

    /// Wait until no connection is registered
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            if self.connection_count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ConnectionRegistry")
            .field("connection_count", &inner.len())
            .field("room_count", &inner.rooms.len())
            .finish()
    }
}

/// Registration guard; unsubscribes on drop
#[must_use = "dropping the subscription unregisters the connection"]
pub struct Subscription {
    registry: Arc<ConnectionRegistry>,
    scope: EventScope,
    id: ConnectionId,
}

impl Subscription {
    #[inline]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    #[inline]
    pub fn scope(&self) -> EventScope {
        self.scope
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.scope, self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
