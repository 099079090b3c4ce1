//! Shelf facade.
//!
//! Wires the collection store, mode controller, rank adjuster and
//! enrichment merger over a backend collaborator. This is the surface the
//! presentation layer talks to: snapshot subscription via the shared store
//! handle, promote/demote, mode switching, and bulk reload around
//! create/delete.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::backend::LinkBackend;
use crate::managers::enrichment_merger::EnrichmentMerger;
use crate::managers::mode_controller::ModeController;
use crate::managers::rank_adjuster::RankAdjuster;
use crate::store::collection_store::CollectionStore;
use crate::types::errors::BackendError;
use crate::types::link::{LinkProperties, LinkRecord, LinkScore, PreviewReady, SortMode};

/// Application facade over the collection store core.
///
/// The store lives behind `Arc<Mutex<_>>` so the preview consumer task can
/// share it; the lock is never held across an await, which keeps each
/// `update`/`set` atomic with respect to publication.
pub struct Shelf<B: LinkBackend> {
    backend: B,
    store: Arc<Mutex<CollectionStore>>,
    controller: ModeController,
    merger: EnrichmentMerger,
}

impl<B: LinkBackend> Shelf<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            store: Arc::new(Mutex::new(CollectionStore::new())),
            controller: ModeController::new(),
            merger: EnrichmentMerger::new(),
        }
    }

    /// Shared handle to the store, for subscriptions and snapshots.
    pub fn store(&self) -> Arc<Mutex<CollectionStore>> {
        Arc::clone(&self.store)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The active sort mode, as owned by the mode controller.
    pub fn mode(&self) -> SortMode {
        self.controller.mode()
    }

    fn lock_store(&self) -> MutexGuard<'_, CollectionStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Full reload from the backend.
    ///
    /// Reads every listed link (entries that vanish mid-load are skipped),
    /// attaches scores by name with an empty-table fallback, reconciles the
    /// persisted rank config against the loaded set, arranges records to
    /// the reconciled baseline order, replaces the store contents, then
    /// requests one preview per newly-seen URL.
    pub async fn load(&mut self) -> Result<(), BackendError> {
        let names = self.backend.list_link_names().await?;
        let scores = self.backend.get_scores().await.unwrap_or_default();

        let mut records: Vec<LinkRecord> = Vec::with_capacity(names.len());
        for name in &names {
            let details = match self.backend.read_link(name).await {
                Ok(details) => details,
                // Deleted between list and read; skip silently.
                Err(_) => continue,
            };
            let score = scores
                .iter()
                .find(|entry| &entry.name == name)
                .map(|entry| LinkScore { id: entry.id.clone(), value: entry.value });
            records.push(details.into_record(name, score));
        }

        let config = self.controller.load_rank_config(&self.backend, &records).await;
        let records = ModeController::apply_order(records, &config.order);
        let urls: Vec<String> = records.iter().map(|r| r.url.clone()).collect();

        {
            let mut store = self.lock_store();
            store.resort(self.controller.mode());
            store.set(records);
        }

        self.request_previews(&urls).await;
        Ok(())
    }

    /// Creates a link on the backend, inserts it locally with the current
    /// timestamp, and requests its preview.
    pub async fn create_link(&mut self, props: LinkProperties) -> Result<String, BackendError> {
        let name = self.backend.create_link(&props).await?;
        let record = LinkRecord {
            name: name.clone(),
            title: props.title,
            desc: props.desc,
            url: props.url.clone(),
            created_at: Some(Self::now()),
            score: None,
            enrichment: None,
        };
        self.lock_store().update(move |mut records| {
            records.push(record);
            records
        });
        self.request_previews(std::slice::from_ref(&props.url)).await;
        Ok(name)
    }

    /// Deletes a link on the backend, then removes it locally. An in-flight
    /// preview for its URL is not cancelled; the merger discards the
    /// result when it arrives.
    pub async fn delete_link(&mut self, name: &str) -> Result<(), BackendError> {
        self.backend.delete_link(name).await?;
        let name = name.to_string();
        self.lock_store().update(move |mut records| {
            records.retain(|r| r.name != name);
            records
        });
        Ok(())
    }

    /// Raises the named record's rank. Optimistic: the local change stands
    /// even when persistence fails; the error is returned for the
    /// presentation layer to report.
    pub async fn promote(&self, name: &str) -> Result<(), BackendError> {
        let table = {
            let mut store = self.lock_store();
            RankAdjuster::promote(&mut store, name)
        };
        match table {
            Some(entries) => self.backend.set_scores(&entries).await,
            None => Ok(()),
        }
    }

    /// Lowers the named record's rank. Same optimistic contract as `promote`.
    pub async fn demote(&self, name: &str) -> Result<(), BackendError> {
        let table = {
            let mut store = self.lock_store();
            RankAdjuster::demote(&mut store, name)
        };
        match table {
            Some(entries) => self.backend.set_scores(&entries).await,
            None => Ok(()),
        }
    }

    /// Switches the sort mode and resorts immediately. Local only.
    pub fn set_mode(&mut self, mode: SortMode) {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        self.controller.set_mode(&mut store, mode);
    }

    /// Starts the consumer for the inbound preview-notification channel.
    pub fn spawn_preview_consumer(&self, rx: UnboundedReceiver<PreviewReady>) -> JoinHandle<()> {
        EnrichmentMerger::spawn_consumer(self.store(), rx)
    }

    /// Requests a preview once per URL; successful results are merged
    /// immediately, failures leave enrichment unset.
    async fn request_previews(&mut self, urls: &[String]) {
        for url in urls {
            if !self.merger.mark_requested(url) {
                continue;
            }
            if let Ok(graph) = self.backend.request_preview(url).await {
                let event = PreviewReady {
                    url: url.clone(),
                    graph: graph.into_enrichment(),
                    resolved_at: Self::now(),
                };
                let mut store = self.lock_store();
                EnrichmentMerger::merge(&mut store, &event);
            }
        }
    }
}
