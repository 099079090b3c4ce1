//! Manual rank adjustments.
//!
//! Promote/demote move a record's score up or down by one. The local phase
//! here applies the change optimistically and hands back the full updated
//! score table; the facade then fires the persistence call. A failed
//! persistence is reported to the caller but the optimistic local state is
//! deliberately left in place.

use uuid::Uuid;

use crate::store::collection_store::CollectionStore;
use crate::types::link::{LinkScore, ScoreEntry, SortMode};

/// Translates promote/demote actions into score deltas on the store.
pub struct RankAdjuster;

impl RankAdjuster {
    /// Raises the named record's score by one.
    ///
    /// Returns the full score table to persist, or `None` when the action
    /// is a no-op: the active mode is not `score`, the name is unknown, or
    /// the record is already ranked first.
    pub fn promote(store: &mut CollectionStore, name: &str) -> Option<Vec<ScoreEntry>> {
        Self::adjust(store, name, 1)
    }

    /// Lowers the named record's score by one. No-op when the record is
    /// already ranked last; scores may go negative.
    pub fn demote(store: &mut CollectionStore, name: &str) -> Option<Vec<ScoreEntry>> {
        Self::adjust(store, name, -1)
    }

    fn adjust(store: &mut CollectionStore, name: &str, delta: i64) -> Option<Vec<ScoreEntry>> {
        if store.mode() != SortMode::Score {
            return None;
        }
        let position = store.records().iter().position(|r| r.name == name)?;
        if delta > 0 && position == 0 {
            return None;
        }
        if delta < 0 && position + 1 == store.records().len() {
            return None;
        }

        store.update(|mut records| {
            for record in &mut records {
                if record.name == name {
                    match &mut record.score {
                        Some(score) => score.value += delta,
                        // First adjustment ever for this record establishes its rank.
                        None => {
                            record.score = Some(LinkScore {
                                id: Uuid::new_v4().to_string(),
                                value: delta,
                            })
                        }
                    }
                }
            }
            records
        });

        Some(Self::score_table(store))
    }

    /// The full score table as currently held in the store.
    pub fn score_table(store: &CollectionStore) -> Vec<ScoreEntry> {
        store
            .records()
            .iter()
            .filter_map(|record| {
                record.score.as_ref().map(|score| ScoreEntry {
                    name: record.name.clone(),
                    id: score.id.clone(),
                    value: score.value,
                })
            })
            .collect()
    }
}
