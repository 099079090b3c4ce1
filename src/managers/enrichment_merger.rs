//! Asynchronous preview merging.
//!
//! Preview results are keyed by URL, never by record identity or request
//! order. A result is merged into every current record sharing that URL;
//! a result for a URL that no longer exists is discarded silently. Merging
//! is idempotent, so duplicate deliveries are harmless.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::store::collection_store::CollectionStore;
use crate::types::link::{Enrichment, PreviewReady};

/// Tracks which URLs have had a preview requested and merges results.
pub struct EnrichmentMerger {
    requested: HashSet<String>,
}

impl EnrichmentMerger {
    pub fn new() -> Self {
        Self { requested: HashSet::new() }
    }

    /// Records that a preview fetch for `url` is being issued. Returns true
    /// only the first time, so each URL gets exactly one request no matter
    /// how many records share it or how often the set reloads.
    pub fn mark_requested(&mut self, url: &str) -> bool {
        self.requested.insert(url.to_string())
    }

    /// Merges a preview result into every record whose `url` matches.
    ///
    /// Fields absent from the result leave the prior value untouched.
    /// Publishes through `CollectionStore::update` with a transform that
    /// only touches `enrichment`; enrichment is not a sort key in any mode,
    /// so the follow-up sort is a no-op on ordering.
    pub fn merge(store: &mut CollectionStore, event: &PreviewReady) {
        if !store.records().iter().any(|r| r.url == event.url) {
            // Deleted before the fetch resolved; discard.
            return;
        }
        let url = event.url.clone();
        let graph = event.graph.clone();
        store.update(move |mut records| {
            for record in &mut records {
                if record.url == url {
                    merge_fields(record.enrichment.get_or_insert_with(Enrichment::default), &graph);
                }
            }
            records
        });
    }

    /// Consumes the inbound preview-notification channel until the sender
    /// side closes, merging each event into the shared store.
    pub fn spawn_consumer(
        store: Arc<Mutex<CollectionStore>>,
        mut rx: UnboundedReceiver<PreviewReady>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
                Self::merge(&mut guard, &event);
            }
        })
    }
}

impl Default for EnrichmentMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_fields(target: &mut Enrichment, incoming: &Enrichment) {
    if let Some(image_url) = &incoming.image_url {
        target.image_url = Some(image_url.clone());
    }
    if let Some(title) = &incoming.title {
        target.title = Some(title.clone());
    }
    if let Some(description) = &incoming.description {
        target.description = Some(description.clone());
    }
}
