use std::sync::Arc;

use crate::models::expense::Expense;

/// Immutable copy of the ledger, newest first.
pub type Snapshot = Arc<[Expense]>;

/// Callback invoked with every published snapshot.
pub type Listener = Box<dyn FnMut(&Snapshot) + Send>;

/// Handle returned by [`ChangeFeed::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Multicast feed of ledger snapshots with replay-of-one semantics.
///
/// Delivery is synchronous: `publish` returns only after every listener has
/// run. A new listener is called immediately with the latest snapshot.
pub struct ChangeFeed {
    latest: Snapshot,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    publish_count: u64,
}

impl ChangeFeed {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            latest: initial,
            listeners: Vec::new(),
            next_id: 0,
            publish_count: 0,
        }
    }

    /// Register a listener. It receives the current snapshot before returning.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut listener: Listener = Box::new(listener);
        listener(&self.latest);
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < before
    }

    /// Replace the latest snapshot and push it to every listener.
    pub fn publish(&mut self, snapshot: Snapshot) {
        self.latest = snapshot;
        self.publish_count += 1;
        for (_, listener) in &mut self.listeners {
            listener(&self.latest);
        }
    }

    #[must_use]
    pub fn latest(&self) -> Snapshot {
        Arc::clone(&self.latest)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of publishes since construction (the initial snapshot is not counted).
    #[must_use]
    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("latest_len", &self.latest.len())
            .field("subscribers", &self.listeners.len())
            .field("publish_count", &self.publish_count)
            .finish()
    }
}
