//! Contract engine for Covenant
//!
//! This crate ties the lower layers together:
//! - Database: record store, transaction closure API, configuration
//! - Transaction coordination and metrics
//! - Contract primitive: creation, signing, cancellation, fan-out, listings
//!
//! The engine is the only component that knows how a contract maps onto
//! per-signer records and which indexes serve its listings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod database;
pub mod primitives;

pub use coordinator::{TransactionCoordinator, TransactionMetrics};
pub use database::{CovenantConfig, Database, CONFIG_FILE_NAME, DEFAULT_PAGE_SIZE};
pub use primitives::{
    contract_id, ContractPage, ContractStore, ContractStoreExt, ContractUpdate, ListMode,
    NewContract,
};
