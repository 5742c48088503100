//! Database: the record store, its transaction coordinator and configuration
//!
//! `Database` owns one `UnifiedStore` and runs every operation through
//! [`Database::transaction`]: the closure gets a fresh `TransactionContext`,
//! and the transaction commits if the closure returns `Ok` and aborts
//! (discarding all buffered writes) if it returns `Err`.
//!
//! ```
//! use covenant_engine::Database;
//!
//! let db = Database::ephemeral();
//! db.transaction(|txn| txn.put("k".to_string(), b"{}".to_vec())).unwrap();
//! assert_eq!(db.storage().len(), 1);
//! ```

pub mod config;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use covenant_concurrency::TransactionContext;
use covenant_core::CovenantResult;
use covenant_storage::UnifiedStore;

use crate::coordinator::{TransactionCoordinator, TransactionMetrics};
use crate::primitives::query_builder::CONTRACT_INDEXES;

pub use config::{CovenantConfig, CONFIG_FILE_NAME, DEFAULT_PAGE_SIZE};

/// In-memory contract database
pub struct Database {
    storage: Arc<UnifiedStore>,
    coordinator: TransactionCoordinator,
    config: CovenantConfig,
}

impl Database {
    /// Open a database with `config`
    ///
    /// # Errors
    /// Returns `InvalidInput` if the configuration does not validate.
    pub fn open(config: CovenantConfig) -> CovenantResult<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self::build(config)))
    }

    /// Open a database with default configuration
    pub fn ephemeral() -> Arc<Self> {
        Arc::new(Self::build(CovenantConfig::default()))
    }

    /// Open a database configured from a `covenant.toml` file
    ///
    /// # Errors
    /// Fails if the file cannot be read, parsed or validated.
    pub fn open_with_config_file(path: &Path) -> CovenantResult<Arc<Self>> {
        let config = CovenantConfig::from_file(path)?;
        info!(target: "covenant::engine", path = %path.display(), "Loaded configuration");
        Self::open(config)
    }

    fn build(config: CovenantConfig) -> Self {
        let storage = Arc::new(UnifiedStore::new());
        for (name, fields) in CONTRACT_INDEXES {
            storage.define_index("contract", name, fields);
        }
        let coordinator = TransactionCoordinator::new(0);
        Self {
            storage,
            coordinator,
            config,
        }
    }

    /// Underlying record store
    pub fn storage(&self) -> &Arc<UnifiedStore> {
        &self.storage
    }

    /// Active configuration
    pub fn config(&self) -> &CovenantConfig {
        &self.config
    }

    /// Transaction counters
    pub fn metrics(&self) -> TransactionMetrics {
        self.coordinator.metrics()
    }

    /// Begin a transaction without the closure API
    ///
    /// The caller must pass it to [`Database::commit_transaction`] or
    /// [`Database::abort_transaction`].
    pub fn begin_transaction(&self) -> TransactionContext {
        self.coordinator.start_transaction(&self.storage)
    }

    /// Commit a transaction started with [`Database::begin_transaction`]
    ///
    /// # Errors
    /// `TransactionAborted` on a conflict with a concurrent commit.
    pub fn commit_transaction(&self, txn: &mut TransactionContext) -> CovenantResult<u64> {
        self.coordinator.commit(txn, self.storage.as_ref())
    }

    /// Abort a transaction started with [`Database::begin_transaction`]
    pub fn abort_transaction(&self, txn: &mut TransactionContext, reason: String) {
        self.coordinator.abort(txn, reason);
    }

    /// Execute a transaction with the given closure
    ///
    /// - Creates a `TransactionContext` over a fresh snapshot
    /// - Executes the closure with it
    /// - Validates and commits on `Ok`
    /// - Aborts on `Err`, discarding every buffered write
    ///
    /// The transaction is not retried on conflict.
    pub fn transaction<F, T>(&self, f: F) -> CovenantResult<T>
    where
        F: FnOnce(&mut TransactionContext) -> CovenantResult<T>,
    {
        self.transaction_with_version(f).map(|(value, _)| value)
    }

    /// Like [`Database::transaction`] but also returns the commit version
    pub fn transaction_with_version<F, T>(&self, f: F) -> CovenantResult<(T, u64)>
    where
        F: FnOnce(&mut TransactionContext) -> CovenantResult<T>,
    {
        let mut txn = self.begin_transaction();
        let result = f(&mut txn);
        self.run_single_attempt(&mut txn, result)
    }

    fn run_single_attempt<T>(
        &self,
        txn: &mut TransactionContext,
        result: CovenantResult<T>,
    ) -> CovenantResult<(T, u64)> {
        match result {
            Ok(value) => {
                let commit_version = self.commit_transaction(txn)?;
                Ok((value, commit_version))
            }
            Err(e) => {
                self.abort_transaction(txn, format!("Closure error: {}", e));
                Err(e)
            }
        }
    }
}
