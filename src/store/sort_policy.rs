//! Pure comparator selection for the three sort modes.
//!
//! The sort is always stable: records comparing equal keep their relative
//! input order. `score` mode routinely has many records tied at 0, and
//! stability is what keeps them from visibly reshuffling on every refresh.

use std::cmp::Ordering;

use crate::types::link::{LinkRecord, SortMode};

/// Compares two records under the given mode.
///
/// - `Normal`: case-insensitive lexicographic by title.
/// - `Date`: `created_at` descending; a missing timestamp counts as epoch 0.
/// - `Score`: `score.value` descending; a missing score counts as 0.
pub fn compare(mode: SortMode, a: &LinkRecord, b: &LinkRecord) -> Ordering {
    match mode {
        SortMode::Normal => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortMode::Date => {
            let a_time = a.created_at.unwrap_or(0);
            let b_time = b.created_at.unwrap_or(0);
            b_time.cmp(&a_time)
        }
        SortMode::Score => {
            let a_value = a.score.as_ref().map(|s| s.value).unwrap_or(0);
            let b_value = b.score.as_ref().map(|s| s.value).unwrap_or(0);
            b_value.cmp(&a_value)
        }
    }
}

/// Stable in-place sort of `records` under `mode`.
pub fn sort_records(records: &mut [LinkRecord], mode: SortMode) {
    records.sort_by(|a, b| compare(mode, a, b));
}

/// Whether `records` is already ordered under `mode`.
pub fn is_sorted(records: &[LinkRecord], mode: SortMode) -> bool {
    records
        .windows(2)
        .all(|pair| compare(mode, &pair[0], &pair[1]) != Ordering::Greater)
}
