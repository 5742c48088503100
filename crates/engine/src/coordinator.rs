//! Transaction coordinator
//!
//! Wraps `TransactionManager` for the database and keeps outcome counters.
//! Aborts are split by cause: a handler that returned an error (`rejected`)
//! versus a commit that lost validation to a concurrent writer
//! (`conflicted`, e.g. two signers approving the same contract at once).

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use covenant_concurrency::{TransactionContext, TransactionManager};
use covenant_core::{CovenantError, CovenantResult, Storage};
use covenant_storage::UnifiedStore;

/// Begins, commits and aborts database transactions
///
/// Counters are observational and use Relaxed ordering.
pub struct TransactionCoordinator {
    manager: TransactionManager,
    in_flight: AtomicU64,
    begun: AtomicU64,
    committed: AtomicU64,
    rejected: AtomicU64,
    conflicted: AtomicU64,
}

impl TransactionCoordinator {
    /// Coordinator whose first commit gets `initial_version + 1`
    pub fn new(initial_version: u64) -> Self {
        Self {
            manager: TransactionManager::new(initial_version),
            in_flight: AtomicU64::new(0),
            begun: AtomicU64::new(0),
            committed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            conflicted: AtomicU64::new(0),
        }
    }

    /// Begin a transaction over a snapshot of `storage`
    pub fn start_transaction(&self, storage: &UnifiedStore) -> TransactionContext {
        let txn = self.manager.begin(Box::new(storage.create_snapshot()));
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        self.begun.fetch_add(1, Ordering::Relaxed);
        debug!(
            target: "covenant::txn",
            txn_id = txn.txn_id,
            start_version = txn.start_version,
            "Transaction started"
        );
        txn
    }

    /// Validate and apply `txn` to `store`
    ///
    /// # Errors
    /// `TransactionAborted` when a concurrent commit invalidated a read or
    /// a query; `Storage` or `Internal` for other commit failures.
    pub fn commit<S: Storage + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> CovenantResult<u64> {
        let outcome = self.manager.commit(txn, store).map_err(CovenantError::from);
        match &outcome {
            Ok(_) => self.settle(&self.committed),
            Err(e) => {
                self.settle(&self.conflicted);
                debug!(target: "covenant::txn", txn_id = txn.txn_id, error = %e, "Commit failed");
            }
        }
        outcome
    }

    /// Abort a transaction whose handler returned an error
    pub fn abort(&self, txn: &mut TransactionContext, reason: String) {
        if self.manager.abort(txn, reason).is_ok() {
            self.settle(&self.rejected);
        }
    }

    fn settle(&self, outcome: &AtomicU64) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_sub(1)));
        outcome.fetch_add(1, Ordering::Relaxed);
    }

    /// Version of the latest commit
    pub fn current_version(&self) -> u64 {
        self.manager.current_version()
    }

    /// Snapshot of the outcome counters
    pub fn metrics(&self) -> TransactionMetrics {
        TransactionMetrics {
            in_flight: self.in_flight.load(Ordering::Relaxed),
            begun: self.begun.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            conflicted: self.conflicted.load(Ordering::Relaxed),
        }
    }
}

/// Transaction outcome counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionMetrics {
    /// Begun but not yet settled
    pub in_flight: u64,
    /// Transactions begun
    pub begun: u64,
    /// Commits applied
    pub committed: u64,
    /// Aborted because the handler returned an error
    pub rejected: u64,
    /// Commits refused by conflict validation
    pub conflicted: u64,
}

impl TransactionMetrics {
    /// Transactions that reached an outcome
    pub fn settled(&self) -> u64 {
        self.committed + self.rejected + self.conflicted
    }

    /// Share of attempted commits lost to conflicts
    pub fn conflict_rate(&self) -> f64 {
        let attempted = self.committed + self.conflicted;
        if attempted == 0 {
            0.0
        } else {
            self.conflicted as f64 / attempted as f64
        }
    }
}
