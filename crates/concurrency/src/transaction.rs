//! Transaction context for OCC
//!
//! This module implements the core transaction data structure for optimistic
//! concurrency control. TransactionContext tracks point reads, full queries
//! and buffered writes for a transaction, enabling validation at commit time.
//!
//! ## Read tracking
//!
//! - `get` records `(key, version)` in the read set; version 0 means absent.
//! - `query` records the result fingerprint `[(key, version)]`. At commit the
//!   query is re-run against current storage and any difference is a phantom.
//! - `query_page` is not tracked. Paginated listings are read-only.
//!
//! Queries read the snapshot only: records written earlier in the same
//! transaction are not visible to them. Point reads do see own writes.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use covenant_core::{
    CovenantError, CovenantResult, Query, QueryPage, SnapshotView, Storage,
};

use crate::validation::{validate_transaction, ValidationResult};

/// Error type for commit failures
///
/// - All-or-nothing commit: transaction either commits or aborts entirely
/// - First-committer-wins: conflicts are detected from the read and query sets
#[derive(Debug, Clone)]
pub enum CommitError {
    /// Transaction aborted due to validation conflicts
    ValidationFailed(ValidationResult),

    /// Transaction was not in correct state for commit
    InvalidState(String),

    /// Storage failed while validating or applying writes
    StorageError(String),
}

impl std::fmt::Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitError::ValidationFailed(result) => {
                write!(f, "Commit failed: {} conflict(s)", result.conflict_count())
            }
            CommitError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            CommitError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for CommitError {}

impl From<CommitError> for CovenantError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::ValidationFailed(result) => CovenantError::TransactionAborted {
                reason: format!("Validation failed: {} conflict(s)", result.conflict_count()),
            },
            CommitError::InvalidState(msg) => CovenantError::internal(msg),
            CommitError::StorageError(msg) => CovenantError::storage(msg),
        }
    }
}

/// Result of applying transaction writes to storage
///
/// All keys in a transaction get the same commit version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    /// Version assigned to all writes in this transaction
    pub commit_version: u64,
    /// Number of records written
    pub puts_applied: usize,
}

/// Transaction status
///
/// State transitions:
/// - `Active` → `Validating` (begin commit)
/// - `Validating` → `Committed` (validation passed)
/// - `Validating` → `Aborted` (conflict detected)
/// - `Active` → `Aborted` (body error)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    Active,
    /// Transaction is being validated for conflicts
    Validating,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// A full query executed by the transaction and the rows it saw
#[derive(Debug, Clone)]
pub struct QueryRead {
    /// The query as issued
    pub query: Query,
    /// `(key, version)` of every row returned, in order
    pub fingerprint: Vec<(String, u64)>,
}

/// Transaction context for OCC
///
/// # Lifecycle
///
/// 1. **BEGIN**: Create with `with_snapshot()`, status is `Active`
/// 2. **READ/WRITE**: Use `get()`, `query()`, `put()`
/// 3. **VALIDATE/COMMIT**: `TransactionManager::commit` validates and applies
/// 4. **ABORT**: `mark_aborted()` discards every buffered write
pub struct TransactionContext {
    /// Unique transaction ID
    pub txn_id: u64,

    /// Version at transaction start (snapshot version)
    pub start_version: u64,

    snapshot: Option<Box<dyn SnapshotView>>,

    /// Keys read from the snapshot and their versions
    ///
    /// Version 0 means the key did not exist when read.
    pub read_set: HashMap<String, u64>,

    /// Full queries and their result fingerprints
    pub query_set: Vec<QueryRead>,

    /// Buffered writes, applied in key order at commit
    pub write_set: BTreeMap<String, Vec<u8>>,

    /// Current transaction status
    pub status: TransactionStatus,

    start_time: Instant,
}

impl TransactionContext {
    /// Create a new transaction context without a snapshot
    ///
    /// Reads fail until a snapshot is attached; useful for write-only
    /// transactions and tests.
    ///
    /// ```
    /// use covenant_concurrency::TransactionContext;
    ///
    /// let txn = TransactionContext::new(1, 100);
    /// assert!(txn.is_active());
    /// ```
    pub fn new(txn_id: u64, start_version: u64) -> Self {
        TransactionContext {
            txn_id,
            start_version,
            snapshot: None,
            read_set: HashMap::new(),
            query_set: Vec::new(),
            write_set: BTreeMap::new(),
            status: TransactionStatus::Active,
            start_time: Instant::now(),
        }
    }

    /// Create a new transaction context with a snapshot
    ///
    /// The snapshot provides a consistent point-in-time view; its version
    /// becomes `start_version`.
    pub fn with_snapshot(txn_id: u64, snapshot: Box<dyn SnapshotView>) -> Self {
        let mut txn = Self::new(txn_id, snapshot.version());
        txn.snapshot = Some(snapshot);
        txn
    }

    fn snapshot(&self) -> CovenantResult<&dyn SnapshotView> {
        self.snapshot
            .as_deref()
            .ok_or_else(|| CovenantError::internal("Transaction has no snapshot for reads"))
    }

    // === Read Operations ===

    /// Get a value from the transaction
    ///
    /// Own writes are returned without a read-set entry. Otherwise the
    /// snapshot is read and `(key, version)` tracked.
    ///
    /// # Errors
    /// Fails if the transaction is not active or has no snapshot.
    pub fn get(&mut self, key: &str) -> CovenantResult<Option<Vec<u8>>> {
        self.ensure_active()?;

        if let Some(value) = self.write_set.get(key) {
            return Ok(Some(value.clone()));
        }

        let versioned = self.snapshot()?.get(key)?;
        match versioned {
            Some(vv) => {
                self.read_set.insert(key.to_string(), vv.version);
                Ok(Some(vv.value))
            }
            None => {
                self.read_set.insert(key.to_string(), 0);
                Ok(None)
            }
        }
    }

    /// Check if a key exists in the transaction's view
    pub fn exists(&mut self, key: &str) -> CovenantResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Run a full query against the snapshot and track its result
    pub fn query(&mut self, query: &Query) -> CovenantResult<Vec<(String, Vec<u8>)>> {
        self.ensure_active()?;

        let rows = self.snapshot()?.query(query)?;
        self.query_set.push(QueryRead {
            query: query.clone(),
            fingerprint: rows.iter().map(|(k, vv)| (k.clone(), vv.version)).collect(),
        });
        Ok(rows.into_iter().map(|(k, vv)| (k, vv.value)).collect())
    }

    /// Run one page of a query against the snapshot (untracked)
    pub fn query_page(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<QueryPage> {
        self.ensure_active()?;
        self.snapshot()?.query_page(query, page_size, bookmark)
    }

    /// Version recorded for `key` in the read set
    pub fn get_read_version(&self, key: &str) -> Option<u64> {
        self.read_set.get(key).copied()
    }

    // === Write Operations ===

    /// Buffer a write
    ///
    /// # Errors
    /// Fails if the transaction is not active.
    pub fn put(&mut self, key: String, value: Vec<u8>) -> CovenantResult<()> {
        self.ensure_active()?;
        self.write_set.insert(key, value);
        Ok(())
    }

    // === State ===

    /// Check if transaction is active
    pub fn is_active(&self) -> bool {
        matches!(self.status, TransactionStatus::Active)
    }

    /// Check if transaction committed
    pub fn is_committed(&self) -> bool {
        matches!(self.status, TransactionStatus::Committed)
    }

    /// Check if transaction aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Time since the transaction started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if transaction can accept operations
    pub fn ensure_active(&self) -> CovenantResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(CovenantError::internal(format!(
                "Transaction {} is not active: {:?}",
                self.txn_id, self.status
            )))
        }
    }

    /// Abort the transaction, discarding buffered writes
    ///
    /// Can be called from `Active` or `Validating`. The read set is kept for
    /// diagnostics.
    ///
    /// # Errors
    /// Fails if already `Committed` or `Aborted`.
    pub fn mark_aborted(&mut self, reason: String) -> CovenantResult<()> {
        match &self.status {
            TransactionStatus::Committed => Err(CovenantError::internal(format!(
                "Cannot abort committed transaction {}",
                self.txn_id
            ))),
            TransactionStatus::Aborted { .. } => Err(CovenantError::internal(format!(
                "Transaction {} already aborted",
                self.txn_id
            ))),
            _ => {
                self.status = TransactionStatus::Aborted { reason };
                self.write_set.clear();
                Ok(())
            }
        }
    }

    // === Commit Operation ===

    /// Validate against `store` and move to `Committed` or `Aborted`
    ///
    /// Writes are not applied here; see `apply_writes`.
    pub fn commit<S: Storage + ?Sized>(&mut self, store: &S) -> Result<(), CommitError> {
        if !self.is_active() {
            return Err(CommitError::InvalidState(format!(
                "Cannot commit transaction {} from {:?} state - must be Active",
                self.txn_id, self.status
            )));
        }
        self.status = TransactionStatus::Validating;

        let validation_result = match validate_transaction(self, store) {
            Ok(result) => result,
            Err(e) => {
                self.status = TransactionStatus::Aborted {
                    reason: format!("Validation error: {}", e),
                };
                self.write_set.clear();
                return Err(CommitError::StorageError(e.to_string()));
            }
        };

        if !validation_result.is_valid() {
            self.status = TransactionStatus::Aborted {
                reason: format!(
                    "Commit failed: {} conflict(s) detected",
                    validation_result.conflict_count()
                ),
            };
            self.write_set.clear();
            return Err(CommitError::ValidationFailed(validation_result));
        }

        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Apply all buffered writes to storage under one version
    ///
    /// # Errors
    /// Fails unless the transaction is `Committed`, or if storage fails.
    pub fn apply_writes<S: Storage + ?Sized>(
        &self,
        store: &S,
        commit_version: u64,
    ) -> CovenantResult<ApplyResult> {
        if !self.is_committed() {
            return Err(CovenantError::internal(format!(
                "Cannot apply writes: transaction {} is {:?}, must be Committed",
                self.txn_id, self.status
            )));
        }
        let writes: Vec<(String, Vec<u8>)> = self
            .write_set
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        store.apply_batch(&writes, commit_version)?;
        Ok(ApplyResult {
            commit_version,
            puts_applied: writes.len(),
        })
    }

    /// Number of point reads tracked
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Number of full queries tracked
    pub fn query_count(&self) -> usize {
        self.query_set.len()
    }

    /// Number of buffered writes
    pub fn write_count(&self) -> usize {
        self.write_set.len()
    }

    /// No buffered writes
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty()
    }

    /// Reason the transaction aborted, if it did
    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            TransactionStatus::Aborted { reason } => Some(reason),
            _ => None,
        }
    }
}
