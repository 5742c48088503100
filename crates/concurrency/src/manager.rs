//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating:
//! 1. Validation (first-committer-wins)
//! 2. Storage application (visibility)
//!
//! Commits are serialized by a commit lock, so validation and application
//! of one transaction never interleave with another's.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. acquire commit lock
//! 2. txn.commit(store) - Active → Validating → Committed | Aborted
//! 3. IF conflicts: return error, nothing written
//! 4. allocate commit_version (one per transaction)
//! 5. apply_writes() - one atomic batch
//! 6. return Ok(commit_version)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use covenant_core::{CovenantResult, SnapshotView, Storage};

use crate::transaction::{CommitError, TransactionContext, TransactionStatus};

/// Manages transaction lifecycle and atomic commits
///
/// The global version counter is incremented once per writing transaction.
/// All keys in a transaction get the same commit version.
pub struct TransactionManager {
    /// Global version counter
    version: AtomicU64,

    /// Next transaction ID
    next_txn_id: AtomicU64,

    /// Serializes validate-and-apply
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    /// Create a new transaction manager starting at `initial_version`
    pub fn new(initial_version: u64) -> Self {
        TransactionManager {
            version: AtomicU64::new(initial_version),
            next_txn_id: AtomicU64::new(1),
            commit_lock: Mutex::new(()),
        }
    }

    /// Get current global version
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Allocate next transaction ID
    pub fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate next commit version
    pub fn allocate_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a transaction over `snapshot`
    pub fn begin(&self, snapshot: Box<dyn SnapshotView>) -> TransactionContext {
        TransactionContext::with_snapshot(self.next_txn_id(), snapshot)
    }

    /// Commit a transaction atomically
    ///
    /// Returns the commit version, or the snapshot version for a read-only
    /// transaction.
    ///
    /// # Errors
    /// - `ValidationFailed` if another transaction changed what this one read
    /// - `InvalidState` if the transaction is not active
    /// - `StorageError` if validation reads or the batch apply fail
    pub fn commit<S: Storage + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> Result<u64, CommitError> {
        let _guard = self.commit_lock.lock();

        if let Err(e) = txn.commit(store) {
            tracing::debug!(
                target: "covenant::txn",
                txn_id = txn.txn_id,
                error = %e,
                "Transaction rejected at commit"
            );
            return Err(e);
        }

        if txn.is_read_only() {
            return Ok(txn.start_version);
        }

        // Writes made outside transactions also advance the store version.
        self.version.fetch_max(store.current_version(), Ordering::SeqCst);
        let commit_version = self.allocate_version();

        match txn.apply_writes(store, commit_version) {
            Ok(applied) => {
                tracing::debug!(
                    target: "covenant::txn",
                    txn_id = txn.txn_id,
                    commit_version,
                    writes = applied.puts_applied,
                    "Transaction committed"
                );
                Ok(commit_version)
            }
            Err(e) => {
                txn.status = TransactionStatus::Aborted {
                    reason: format!("Storage application failed: {}", e),
                };
                Err(CommitError::StorageError(e.to_string()))
            }
        }
    }

    /// Explicitly abort a transaction
    ///
    /// All buffered writes are discarded.
    pub fn abort(&self, txn: &mut TransactionContext, reason: String) -> CovenantResult<()> {
        tracing::debug!(
            target: "covenant::txn",
            txn_id = txn.txn_id,
            reason = %reason,
            "Transaction aborted"
        );
        txn.mark_aborted(reason)
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(0)
    }
}
