//! ClonedSnapshotView: snapshot implementation via deep clone
//!
//! This module provides version-bounded views of storage for transaction isolation.
//! The snapshot clones the record map and the field indices at creation time.
//!
//! # Design Notes
//!
//! - **Deep clone**: Full BTreeMap copy; parsed documents are shared via `Arc`
//! - **Immutable**: Once created, the snapshot never changes
//! - **Thread-safe**: Can be safely shared across threads (Arc-wrapped data)

use std::collections::BTreeMap;
use std::sync::Arc;

use covenant_core::{CovenantResult, Query, QueryPage, SnapshotView, VersionedValue};

use crate::index::IndexRegistry;
use crate::query::{execute, execute_page};
use crate::stored_value::StoredValue;

/// A snapshot view that clones the entire BTreeMap
///
/// # Example
///
/// ```
/// use covenant_core::{SnapshotView, Storage};
/// use covenant_storage::UnifiedStore;
///
/// let store = UnifiedStore::new();
/// let snapshot = store.create_snapshot();
///
/// // Writes after snapshot creation are not visible
/// store.put("k".to_string(), b"{}".to_vec()).unwrap();
/// assert!(snapshot.get("k").unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ClonedSnapshotView {
    /// The version at which this snapshot was created
    version: u64,
    /// Deep clone of the storage data at snapshot time
    data: Arc<BTreeMap<String, StoredValue>>,
    /// Index state matching `data`
    indexes: Arc<IndexRegistry>,
}

impl ClonedSnapshotView {
    /// Create a new ClonedSnapshotView from existing data
    ///
    /// Typically called by `UnifiedStore::create_snapshot()`, not directly.
    pub fn new(version: u64, data: BTreeMap<String, StoredValue>, indexes: IndexRegistry) -> Self {
        Self {
            version,
            data: Arc::new(data),
            indexes: Arc::new(indexes),
        }
    }

    /// Create an empty snapshot at version 0
    pub fn empty() -> Self {
        Self::new(0, BTreeMap::new(), IndexRegistry::new())
    }

    /// Number of keys in the snapshot
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SnapshotView for ClonedSnapshotView {
    fn get(&self, key: &str) -> CovenantResult<Option<VersionedValue>> {
        Ok(self.data.get(key).map(StoredValue::to_versioned))
    }

    fn query(&self, query: &Query) -> CovenantResult<Vec<(String, VersionedValue)>> {
        Ok(execute(&self.data, &self.indexes, query))
    }

    fn query_page(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<QueryPage> {
        execute_page(&self.data, &self.indexes, query, page_size, bookmark)
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_core::Selector;

    #[test]
    fn test_empty_snapshot() {
        let snap = ClonedSnapshotView::empty();
        assert_eq!(snap.version(), 0);
        assert!(snap.is_empty());
        assert!(snap.get("anything").unwrap().is_none());
        assert!(snap.query(&Query::new(Selector::exists("a"))).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_reads() {
        let mut data = BTreeMap::new();
        data.insert("k".to_string(), StoredValue::new(br#"{"a":1}"#.to_vec(), 7));
        let snap = ClonedSnapshotView::new(7, data, IndexRegistry::new());

        let got = snap.get("k").unwrap().unwrap();
        assert_eq!(got.version, 7);
        assert_eq!(snap.query(&Query::new(Selector::eq("a", 1))).unwrap().len(), 1);
        assert_eq!(snap.len(), 1);
    }
}
