//! Integration tests for the storage layer
//!
//! These tests verify that UnifiedStore works correctly as a complete system:
//! - Queries with sorts, indexes and bookmarks over realistic records
//! - Batch atomicity under concurrent readers
//! - Snapshot isolation guarantees

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use serde_json::json;

use covenant_core::{Query, Selector, SnapshotView, Storage};
use covenant_storage::UnifiedStore;

// ============================================================================
// Helper Functions
// ============================================================================

fn record(id: &str, signer: &str, app: &str, created: u32) -> (String, Vec<u8>) {
    let doc = json!({
        "@contract": id,
        "application_id": app,
        "created_time": format!("2026-01-01T00:00:{:02}.000000Z", created % 60),
        "sign": { "signer": signer },
    });
    (format!("CTR_{}_{}", id, signer), doc.to_string().into_bytes())
}

fn setup(count: u32) -> UnifiedStore {
    let store = UnifiedStore::new();
    store.define_index("contract", "id", &["@contract"]);
    store.define_index(
        "contract",
        "created-time",
        &["sign.signer", "application_id", "created_time"],
    );
    let writes: Vec<_> = (0..count)
        .flat_map(|i| {
            let id = format!("c{:03}", i);
            vec![record(&id, "alice", "escrow", i), record(&id, "bob", "escrow", i)]
        })
        .collect();
    store.apply_batch(&writes, 1).unwrap();
    store
}

fn alice_listing() -> Query {
    Query::new(Selector::and(vec![
        Selector::exists("@contract"),
        Selector::eq("sign.signer", "alice"),
        Selector::eq("application_id", "escrow"),
    ]))
    .sort_desc("sign.signer")
    .sort_desc("application_id")
    .sort_desc("created_time")
    .use_index("contract", "created-time")
}

// ============================================================================
// Query Tests
// ============================================================================

mod queries {
    use super::*;

    #[test]
    fn test_by_id_returns_every_copy() {
        let store = setup(10);
        let q = Query::new(Selector::eq("@contract", "c004")).use_index("contract", "id");
        let keys: Vec<String> = store.query(&q).unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["CTR_c004_alice", "CTR_c004_bob"]);
    }

    #[test]
    fn test_listing_is_newest_first() {
        let store = setup(5);
        let rows = store.query(&alice_listing()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].0, "CTR_c004_alice");
        assert_eq!(rows[4].0, "CTR_c000_alice");
    }

    #[test]
    fn test_unknown_index_hint_still_answers() {
        let store = setup(3);
        let q = Query::new(Selector::eq("@contract", "c001")).use_index("contract", "nope");
        assert_eq!(store.query(&q).unwrap().len(), 2);
    }

    #[test]
    fn test_non_json_values_are_invisible() {
        let store = setup(1);
        store.put("CTR_raw".to_string(), b"\x00\x01".to_vec()).unwrap();
        assert!(store.get("CTR_raw").unwrap().is_some());
        let all = Query::new(Selector::exists("@contract"));
        assert_eq!(store.query(&all).unwrap().len(), 2);
    }
}

// ============================================================================
// Pagination Tests
// ============================================================================

mod pagination {
    use super::*;

    #[test]
    fn test_pages_of_twenty() {
        let store = setup(45);
        let q = alice_listing();

        let p1 = store.query_page(&q, 20, None).unwrap();
        let p2 = store.query_page(&q, 20, Some(&p1.metadata.bookmark)).unwrap();
        let p3 = store.query_page(&q, 20, Some(&p2.metadata.bookmark)).unwrap();

        assert_eq!(p1.metadata.fetched_records_count, 20);
        assert_eq!(p2.metadata.fetched_records_count, 20);
        assert_eq!(p3.metadata.fetched_records_count, 5);
        assert_ne!(p1.metadata.bookmark, p2.metadata.bookmark);
    }

    #[test]
    fn test_bookmark_survives_inserts_before_position() {
        let store = setup(10);
        let q = alice_listing();
        let p1 = store.query_page(&q, 4, None).unwrap();
        let last_seen = p1.records.last().unwrap().0.clone();

        // sorts ahead of everything already returned
        let (key, value) = record("c999", "alice", "escrow", 59);
        store.put(key, value).unwrap();

        let p2 = store.query_page(&q, 4, Some(&p1.metadata.bookmark)).unwrap();
        assert!(p2.records.iter().all(|(k, _)| k != &last_seen && k != "CTR_c999_alice"));
        assert_eq!(p2.records.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_pages_partition_the_result(count in 0u32..40, page_size in 1usize..9) {
            let store = setup(count);
            let q = alice_listing();
            let expected: Vec<String> = store.query(&q).unwrap().into_iter().map(|(k, _)| k).collect();

            let mut seen = Vec::new();
            let mut bookmark = String::new();
            loop {
                let page = store.query_page(&q, page_size, Some(&bookmark)).unwrap();
                prop_assert!(page.records.len() <= page_size);
                if page.records.is_empty() {
                    break;
                }
                seen.extend(page.records.into_iter().map(|(k, _)| k));
                bookmark = page.metadata.bookmark;
            }
            prop_assert_eq!(seen, expected);
        }
    }
}

// ============================================================================
// Atomicity and Isolation Tests
// ============================================================================

mod atomicity {
    use super::*;

    #[test]
    fn test_readers_never_see_partial_batch() {
        let store = Arc::new(setup(0));
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for v in 1..=200u64 {
                    let id = format!("b{:04}", v);
                    let writes = vec![
                        record(&id, "alice", "escrow", 0),
                        record(&id, "bob", "escrow", 0),
                        record(&id, "carol", "escrow", 0),
                    ];
                    store.apply_batch(&writes, v + 1).unwrap();
                }
            })
        };

        let all = Query::new(Selector::exists("@contract"));
        for _ in 0..200 {
            let n = store.query(&all).unwrap().len();
            assert_eq!(n % 3, 0, "observed a partial batch of {} records", n);
        }
        writer.join().unwrap();
        assert_eq!(store.query(&all).unwrap().len(), 600);
    }

    #[test]
    fn test_snapshot_version_and_isolation() {
        let store = setup(2);
        let snap = store.create_snapshot();
        assert_eq!(snap.version(), store.current_version());

        let (key, value) = record("c777", "alice", "escrow", 7);
        store.put(key.clone(), value).unwrap();

        assert!(snap.get(&key).unwrap().is_none());
        assert_eq!(snap.query(&alice_listing()).unwrap().len(), 2);
        assert_eq!(store.query(&alice_listing()).unwrap().len(), 3);
    }
}
