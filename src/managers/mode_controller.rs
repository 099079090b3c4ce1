//! Sort-mode ownership and persisted-ranking reconciliation.
//!
//! The controller is the sole writer of the active sort mode; switching
//! modes resorts the store immediately and never triggers a data refetch.
//! On every full reload it also reconciles the persisted rank config
//! against the live record set, so externally deleted or added records
//! cannot desynchronize the saved ordering.

use std::collections::HashSet;

use crate::backend::LinkBackend;
use crate::store::collection_store::CollectionStore;
use crate::types::link::{LinkRecord, RankConfig, SortMode};

/// Owns the current `SortMode`.
pub struct ModeController {
    mode: SortMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self { mode: SortMode::default() }
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Switches the active mode and immediately resorts the store.
    /// Purely local; no network round-trip.
    pub fn set_mode(&mut self, store: &mut CollectionStore, new_mode: SortMode) {
        self.mode = new_mode;
        store.resort(new_mode);
    }

    /// Adopts a mode without touching the store (used when the store is
    /// about to be repopulated anyway).
    pub fn adopt_mode(&mut self, mode: SortMode) {
        self.mode = mode;
    }

    /// Loads the persisted rank config, healing or synthesizing as needed.
    ///
    /// Absent config or a failed fetch yields a synthesized default
    /// (`score` mode, live names in load order) which is written back.
    /// A present config is reconciled against `live`; if healing changed
    /// the order, the healed config is written back. Persistence failures
    /// here are absorbed: the returned config is authoritative locally
    /// either way. The controller adopts the returned config's mode.
    pub async fn load_rank_config<B: LinkBackend>(
        &mut self,
        backend: &B,
        live: &[LinkRecord],
    ) -> RankConfig {
        let config = match backend.get_rank_config().await {
            Ok(Some(stored)) => {
                let order = Self::reconcile(&stored.order, live);
                let healed = RankConfig { mode: stored.mode, order };
                if healed.order != stored.order {
                    let _ = backend.set_rank_config(&healed).await;
                }
                healed
            }
            Ok(None) | Err(_) => {
                let synthesized = RankConfig {
                    mode: SortMode::Score,
                    order: live.iter().map(|r| r.name.clone()).collect(),
                };
                let _ = backend.set_rank_config(&synthesized).await;
                synthesized
            }
        };
        self.mode = config.mode;
        config
    }

    /// Stable ordered intersection of a persisted order with the live set.
    ///
    /// Names no longer present are dropped; records the persisted order has
    /// never seen are appended in their natural load order. Stale names in
    /// a malformed config are healed here, never surfaced as an error.
    pub fn reconcile(order: &[String], live: &[LinkRecord]) -> Vec<String> {
        let live_names: HashSet<&str> = live.iter().map(|r| r.name.as_str()).collect();
        let mut reconciled: Vec<String> = order
            .iter()
            .filter(|name| live_names.contains(name.as_str()))
            .cloned()
            .collect();
        let known: HashSet<&str> = reconciled.iter().map(String::as_str).collect();
        let appended: Vec<String> = live
            .iter()
            .filter(|r| !known.contains(r.name.as_str()))
            .map(|r| r.name.clone())
            .collect();
        reconciled.extend(appended);
        reconciled
    }

    /// Arranges `records` to match `order`. The result becomes the stable
    /// baseline that tie-breaking preserves in `score` mode. Names missing
    /// from `order` keep their relative position after the ordered ones.
    pub fn apply_order(records: Vec<LinkRecord>, order: &[String]) -> Vec<LinkRecord> {
        let mut remaining = records;
        let mut arranged = Vec::with_capacity(remaining.len());
        for name in order {
            if let Some(idx) = remaining.iter().position(|r| &r.name == name) {
                arranged.push(remaining.remove(idx));
            }
        }
        arranged.extend(remaining);
        arranged
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
