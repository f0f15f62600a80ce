//! Change Notifier Module
//!
//! Explicit subscription list invoked after every store mutation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::cache::CacheEntry;

/// Full view of the store, ordered by key.
pub type CacheSnapshot = BTreeMap<String, CacheEntry>;

/// Callback receiving the snapshot after a mutation.
pub type ChangeListener = Arc<dyn Fn(&CacheSnapshot) + Send + Sync>;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// == Change Notifier ==
/// Ordered list of change listeners.
///
/// Listeners run synchronously, in subscription order.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_id: u64,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    // == Subscribe ==
    /// Registers a listener and returns its handle.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CacheSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    // == Unsubscribe ==
    /// Removes a listener. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    // == Notify ==
    /// Delivers `snapshot` to every listener.
    pub fn notify(&self, snapshot: &CacheSnapshot) {
        for (_, listener) in &self.listeners {
            listener(snapshot);
        }
    }
}
