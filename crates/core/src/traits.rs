//! Core traits for storage and snapshot abstraction
//!
//! This module defines the Storage and SnapshotView traits that let the
//! transaction layer and the contract engine run against any record store
//! offering point reads, indexed queries and atomic batch application.

use crate::error::CovenantResult;
use crate::query::{Query, QueryMetadata};

/// A stored value with the version of the write that produced it
///
/// Versions are assigned per committed transaction and are strictly
/// positive; version 0 means "absent" in read sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    /// Raw value bytes (records are JSON)
    pub value: Vec<u8>,
    /// Commit version of the write
    pub version: u64,
}

/// One page of a paginated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage {
    /// Matching records, in query order
    pub records: Vec<(String, VersionedValue)>,
    /// Count and next bookmark
    pub metadata: QueryMetadata,
}

/// Storage abstraction for the record store
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Get current value for key
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &str) -> CovenantResult<Option<VersionedValue>>;

    /// Put a single value outside any transaction
    ///
    /// Returns the version assigned to this write.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put(&self, key: String, value: Vec<u8>) -> CovenantResult<u64>;

    /// Run a query against current state, returning every match in order
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn query(&self, query: &Query) -> CovenantResult<Vec<(String, VersionedValue)>>;

    /// Run a query against current state, one page at a time
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed bookmark or a failed storage operation.
    fn query_page(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<QueryPage>;

    /// Get current global version
    fn current_version(&self) -> u64;

    /// Apply writes atomically, all tagged with `version`
    ///
    /// No reader may observe a subset of the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn apply_batch(&self, writes: &[(String, Vec<u8>)], version: u64) -> CovenantResult<()>;
}

/// Snapshot view abstraction for snapshot isolation
///
/// Provides a version-bounded read view of storage.
///
/// Thread safety: Must be safe to pass between threads (Send + Sync).
pub trait SnapshotView: Send + Sync {
    /// Get value from snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &str) -> CovenantResult<Option<VersionedValue>>;

    /// Run a query against the snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn query(&self, query: &Query) -> CovenantResult<Vec<(String, VersionedValue)>>;

    /// Run a paginated query against the snapshot
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed bookmark or a failed storage operation.
    fn query_page(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<QueryPage>;

    /// Get snapshot version
    fn version(&self) -> u64;
}
