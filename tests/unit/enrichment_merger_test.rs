use std::sync::{Arc, Mutex};

use linkshelf::managers::enrichment_merger::EnrichmentMerger;
use linkshelf::store::collection_store::CollectionStore;
use linkshelf::types::link::{Enrichment, LinkRecord, PreviewReady, SortMode};

fn record(name: &str, url: &str) -> LinkRecord {
    LinkRecord {
        name: name.to_string(),
        title: name.to_string(),
        desc: None,
        url: url.to_string(),
        created_at: None,
        score: None,
        enrichment: None,
    }
}

fn event(url: &str, title: Option<&str>, image: Option<&str>) -> PreviewReady {
    PreviewReady {
        url: url.to_string(),
        graph: Enrichment {
            image_url: image.map(str::to_string),
            title: title.map(str::to_string),
            description: None,
        },
        resolved_at: 1700000000,
    }
}

#[test]
fn test_merge_fills_matching_record() {
    let mut store = CollectionStore::new();
    store.set(vec![record("a", "https://a.example.com")]);
    EnrichmentMerger::merge(&mut store, &event("https://a.example.com", Some("A"), None));
    let enrichment = store.records()[0].enrichment.as_ref().unwrap();
    assert_eq!(enrichment.title.as_deref(), Some("A"));
    assert_eq!(enrichment.image_url, None);
}

#[test]
fn test_merge_matches_all_duplicate_urls() {
    let mut store = CollectionStore::new();
    store.set(vec![
        record("a", "https://dup.example.com"),
        record("b", "https://dup.example.com"),
        record("c", "https://other.example.com"),
    ]);
    EnrichmentMerger::merge(&mut store, &event("https://dup.example.com", Some("Dup"), None));
    for r in store.records() {
        if r.url == "https://dup.example.com" {
            assert_eq!(r.enrichment.as_ref().unwrap().title.as_deref(), Some("Dup"));
        } else {
            assert!(r.enrichment.is_none());
        }
    }
}

#[test]
fn test_partial_merge_keeps_prior_fields() {
    let mut store = CollectionStore::new();
    store.set(vec![record("a", "https://a.example.com")]);
    EnrichmentMerger::merge(
        &mut store,
        &event("https://a.example.com", Some("First title"), Some("https://a.example.com/og.png")),
    );
    // A later partial result updates the title and leaves the image alone.
    EnrichmentMerger::merge(&mut store, &event("https://a.example.com", Some("Second title"), None));
    let enrichment = store.records()[0].enrichment.as_ref().unwrap();
    assert_eq!(enrichment.title.as_deref(), Some("Second title"));
    assert_eq!(enrichment.image_url.as_deref(), Some("https://a.example.com/og.png"));
}

#[test]
fn test_merge_is_idempotent() {
    let mut store = CollectionStore::new();
    store.set(vec![record("a", "https://a.example.com")]);
    let payload = event("https://a.example.com", Some("A"), Some("https://a.example.com/og.png"));
    EnrichmentMerger::merge(&mut store, &payload);
    let once = store.records().to_vec();
    EnrichmentMerger::merge(&mut store, &payload);
    assert_eq!(store.records(), once.as_slice());
}

#[test]
fn test_result_for_deleted_url_is_discarded() {
    let mut store = CollectionStore::new();
    store.set(vec![record("a", "https://a.example.com")]);
    let before = store.records().to_vec();
    EnrichmentMerger::merge(&mut store, &event("https://gone.example.com", Some("Gone"), None));
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn test_merge_does_not_disturb_order() {
    let mut store = CollectionStore::with_mode(SortMode::Normal);
    store.set(vec![
        record("banana", "https://b.example.com"),
        record("apple", "https://a.example.com"),
        record("cherry", "https://c.example.com"),
    ]);
    let before: Vec<String> = store.records().iter().map(|r| r.name.clone()).collect();
    EnrichmentMerger::merge(&mut store, &event("https://b.example.com", Some("B"), None));
    let after: Vec<String> = store.records().iter().map(|r| r.name.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_mark_requested_dedupes_urls() {
    let mut merger = EnrichmentMerger::new();
    assert!(merger.mark_requested("https://a.example.com"));
    assert!(!merger.mark_requested("https://a.example.com"));
    assert!(merger.mark_requested("https://b.example.com"));
}

#[test]
fn test_merge_applies_json_channel_payload() {
    // Payloads arrive over the notification channel as camelCase JSON.
    let payload: PreviewReady = serde_json::from_str(
        r#"{
            "url": "https://a.example.com",
            "graph": { "imageUrl": "https://a.example.com/og.png", "description": "A page" },
            "resolvedAt": 1700000123
        }"#,
    )
    .unwrap();
    let mut store = CollectionStore::new();
    store.set(vec![record("a", "https://a.example.com")]);
    EnrichmentMerger::merge(&mut store, &payload);
    let enrichment = store.records()[0].enrichment.as_ref().unwrap();
    assert_eq!(enrichment.description.as_deref(), Some("A page"));
    assert_eq!(enrichment.image_url.as_deref(), Some("https://a.example.com/og.png"));
}

#[tokio::test]
async fn test_consumer_drains_channel_in_any_order() {
    let store = Arc::new(Mutex::new(CollectionStore::new()));
    store.lock().unwrap().set(vec![
        record("a", "https://a.example.com"),
        record("b", "https://b.example.com"),
    ]);

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = EnrichmentMerger::spawn_consumer(Arc::clone(&store), rx);

    // Results arrive in the reverse order of any imaginable request sequence,
    // plus a duplicate and one for a URL nobody holds.
    tx.send(event("https://b.example.com", Some("B"), None)).unwrap();
    tx.send(event("https://a.example.com", Some("A"), None)).unwrap();
    tx.send(event("https://a.example.com", Some("A"), None)).unwrap();
    tx.send(event("https://gone.example.com", Some("X"), None)).unwrap();
    drop(tx);
    handle.await.unwrap();

    let store = store.lock().unwrap();
    let titles: Vec<Option<String>> = store
        .records()
        .iter()
        .map(|r| r.enrichment.as_ref().and_then(|e| e.title.clone()))
        .collect();
    assert_eq!(titles, vec![Some("A".to_string()), Some("B".to_string())]);
}
