//! Property-based tests for persisted-ranking reconciliation.
//!
//! Reconciliation intersects a persisted name order with the live record
//! set: stale names are dropped, relative order is preserved, and records
//! the persisted order never saw are appended in their natural load order.

use std::collections::HashSet;

use proptest::prelude::*;

use linkshelf::managers::mode_controller::ModeController;
use linkshelf::types::link::LinkRecord;

fn record(name: &str) -> LinkRecord {
    LinkRecord {
        name: name.to_string(),
        title: name.to_string(),
        desc: None,
        url: format!("https://{}.example.com", name),
        created_at: None,
        score: None,
        enrichment: None,
    }
}

/// A pool of candidate names, a persisted subset in arbitrary order, and a
/// live subset in arbitrary order — modeling links deleted and added
/// externally since the config was last saved.
fn arb_orders() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    let pool: Vec<String> = (0..10).map(|i| format!("n{}", i)).collect();
    (
        proptest::sample::subsequence(pool.clone(), 0..=10).prop_shuffle(),
        proptest::sample::subsequence(pool, 0..=10).prop_shuffle(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn reconciled_names_are_exactly_the_live_names((persisted, live_names) in arb_orders()) {
        let live: Vec<LinkRecord> = live_names.iter().map(|n| record(n)).collect();
        let reconciled = ModeController::reconcile(&persisted, &live);

        let reconciled_set: HashSet<&str> = reconciled.iter().map(String::as_str).collect();
        let live_set: HashSet<&str> = live_names.iter().map(String::as_str).collect();
        prop_assert_eq!(reconciled_set, live_set);
        prop_assert_eq!(reconciled.len(), live_names.len());
    }

    #[test]
    fn reconcile_preserves_persisted_relative_order((persisted, live_names) in arb_orders()) {
        let live: Vec<LinkRecord> = live_names.iter().map(|n| record(n)).collect();
        let reconciled = ModeController::reconcile(&persisted, &live);

        // Among surviving names the persisted order must be intact.
        let surviving: Vec<&String> = persisted
            .iter()
            .filter(|n| live_names.contains(n))
            .collect();
        let prefix: Vec<&String> = reconciled.iter().take(surviving.len()).collect();
        prop_assert_eq!(surviving, prefix);
    }

    #[test]
    fn reconcile_appends_unseen_names_in_load_order((persisted, live_names) in arb_orders()) {
        let live: Vec<LinkRecord> = live_names.iter().map(|n| record(n)).collect();
        let reconciled = ModeController::reconcile(&persisted, &live);

        let persisted_set: HashSet<&str> = persisted.iter().map(String::as_str).collect();
        let expected_tail: Vec<&String> = live_names
            .iter()
            .filter(|n| !persisted_set.contains(n.as_str()))
            .collect();
        let tail: Vec<&String> = reconciled
            .iter()
            .skip(reconciled.len() - expected_tail.len())
            .collect();
        prop_assert_eq!(expected_tail, tail);
    }

    #[test]
    fn reconcile_is_idempotent((persisted, live_names) in arb_orders()) {
        let live: Vec<LinkRecord> = live_names.iter().map(|n| record(n)).collect();
        let once = ModeController::reconcile(&persisted, &live);
        let twice = ModeController::reconcile(&once, &live);
        prop_assert_eq!(once, twice);
    }
}
