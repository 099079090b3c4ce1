//! The in-memory collection store.
//!
//! Owns the authoritative ordered list of link records. Every mutation goes
//! through `update`/`set`/`resort`, and the list is re-sorted under the
//! active mode before any subscriber sees it — the published sequence is
//! always a function of `(records, mode)` and nothing else.

use crate::store::sort_policy;
use crate::types::link::{LinkRecord, SortMode};

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type SubscriberFn = Box<dyn FnMut(&[LinkRecord]) + Send>;

struct Subscriber {
    id: SubscriberId,
    callback: SubscriberFn,
}

/// In-memory store for the link collection.
///
/// Plain `&mut self` state object; the facade shares one instance behind an
/// `Arc<Mutex<_>>`, which makes each mutation atomic with respect to
/// publication. Callbacks run while the store is mutably borrowed, so they
/// cannot re-enter it.
pub struct CollectionStore {
    records: Vec<LinkRecord>,
    mode: SortMode,
    subscribers: Vec<Subscriber>,
    next_subscriber: u64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::with_mode(SortMode::default())
    }

    pub fn with_mode(mode: SortMode) -> Self {
        Self {
            records: Vec::new(),
            mode,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// The current snapshot, always sorted under the active mode.
    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    /// The sort key last applied by the mode controller.
    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Registers a subscriber. The callback receives the current snapshot
    /// immediately, then every subsequent snapshot after a mutation.
    /// Subscribers are independent and all see identical snapshots.
    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriberId
    where
        F: FnMut(&[LinkRecord]) + Send + 'static,
    {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        callback(&self.records);
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a subscriber. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Applies `transform` to the current record list, re-sorts the result
    /// under the active mode, then publishes.
    ///
    /// `transform` must not reorder records itself; ordering is exclusively
    /// the sort policy's job and is reimposed here regardless.
    pub fn update<F>(&mut self, transform: F)
    where
        F: FnOnce(Vec<LinkRecord>) -> Vec<LinkRecord>,
    {
        let current = std::mem::take(&mut self.records);
        self.records = transform(current);
        self.publish();
    }

    /// Replaces the entire collection, sorts under the active mode, publishes.
    pub fn set(&mut self, records: Vec<LinkRecord>) {
        self.records = records;
        self.publish();
    }

    /// Adopts `mode` as the active sort key and republishes.
    ///
    /// Called only by the mode controller, which owns the authoritative mode
    /// value; the store keeps a copy purely as its sort key.
    pub fn resort(&mut self, mode: SortMode) {
        self.mode = mode;
        self.publish();
    }

    /// Sorts, then notifies every subscriber with the fresh snapshot.
    /// The sort runs before any callback, so no subscriber can observe an
    /// unordered intermediate state.
    fn publish(&mut self) {
        sort_policy::sort_records(&mut self.records, self.mode);
        for subscriber in &mut self.subscribers {
            (subscriber.callback)(&self.records);
        }
    }
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}
