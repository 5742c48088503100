//! UnifiedStore: in-memory storage backend with BTreeMap and version management
//!
//! This module implements the Storage trait using:
//! - `BTreeMap<String, StoredValue>` for ordered key storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing version numbers
//! - Declared indexes whose field indices narrow equality queries
//!
//! # Design Notes
//!
//! - **No version history**: Each key stores only its latest value
//! - **Lock order**: `data` before `indexes`, for readers and writers alike
//! - **Atomic batches**: `apply_batch` holds the data write lock for the whole
//!   batch, so no reader observes a partial commit

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use covenant_core::{CovenantResult, IndexHint, Query, QueryPage, Storage, VersionedValue};

use crate::index::{IndexDefinition, IndexRegistry};
use crate::query::{execute, execute_page};
use crate::snapshot::ClonedSnapshotView;
use crate::stored_value::StoredValue;

/// Unified storage backend using BTreeMap with RwLock
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicU64`.
#[derive(Debug)]
pub struct UnifiedStore {
    /// The main data store: ordered map from record key to StoredValue
    data: Arc<RwLock<BTreeMap<String, StoredValue>>>,
    /// Declared indexes, updated under the data write lock
    indexes: Arc<RwLock<IndexRegistry>>,
    /// Global version counter for monotonically increasing versions
    version: AtomicU64,
}

impl UnifiedStore {
    /// Create a new empty UnifiedStore
    ///
    /// Initial version is 0 (no writes have occurred).
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            indexes: Arc::new(RwLock::new(IndexRegistry::new())),
            version: AtomicU64::new(0),
        }
    }

    /// Declare an index under `design_doc/name` over `fields`
    ///
    /// Existing records are indexed immediately.
    pub fn define_index(&self, design_doc: &str, name: &str, fields: &[&str]) {
        let data = self.data.read();
        let mut indexes = self.indexes.write();
        let definition = IndexDefinition {
            hint: IndexHint {
                design_doc: design_doc.to_string(),
                name: name.to_string(),
            },
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        tracing::debug!(
            target: "covenant::storage",
            index = %definition.hint,
            fields = ?definition.fields,
            "Index defined"
        );
        indexes.define(definition, data.iter());
    }

    /// Check whether `design_doc/name` is declared
    pub fn has_index(&self, design_doc: &str, name: &str) -> bool {
        let hint = IndexHint {
            design_doc: design_doc.to_string(),
            name: name.to_string(),
        };
        self.indexes.read().definition(&hint).is_some()
    }

    /// Allocate the next version atomically
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn write_locked(
        data: &mut BTreeMap<String, StoredValue>,
        indexes: &mut IndexRegistry,
        key: String,
        value: StoredValue,
    ) {
        let old = data.get(&key);
        indexes.on_write(&key, old, &value);
        data.insert(key, value);
    }

    /// Create a snapshot of the current state
    ///
    /// Deep-clones the map and indices. The snapshot captures the data at
    /// the current version and is immutable.
    pub fn create_snapshot(&self) -> ClonedSnapshotView {
        let data = self.data.read();
        let indexes = self.indexes.read();
        let version = self.current_version();
        ClonedSnapshotView::new(version, data.clone(), indexes.clone())
    }

    /// Number of keys in the store
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for UnifiedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for UnifiedStore {
    fn get(&self, key: &str) -> CovenantResult<Option<VersionedValue>> {
        let data = self.data.read();
        Ok(data.get(key).map(StoredValue::to_versioned))
    }

    fn put(&self, key: String, value: Vec<u8>) -> CovenantResult<u64> {
        let mut data = self.data.write();
        let mut indexes = self.indexes.write();
        let version = self.next_version();
        Self::write_locked(&mut data, &mut indexes, key, StoredValue::new(value, version));
        Ok(version)
    }

    fn query(&self, query: &Query) -> CovenantResult<Vec<(String, VersionedValue)>> {
        let data = self.data.read();
        let indexes = self.indexes.read();
        Ok(execute(&data, &indexes, query))
    }

    fn query_page(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<QueryPage> {
        let data = self.data.read();
        let indexes = self.indexes.read();
        execute_page(&data, &indexes, query, page_size, bookmark)
    }

    fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn apply_batch(&self, writes: &[(String, Vec<u8>)], version: u64) -> CovenantResult<()> {
        let mut data = self.data.write();
        let mut indexes = self.indexes.write();
        for (key, value) in writes {
            Self::write_locked(
                &mut data,
                &mut indexes,
                key.clone(),
                StoredValue::new(value.clone(), version),
            );
        }
        self.version.fetch_max(version, Ordering::SeqCst);
        Ok(())
    }
}
