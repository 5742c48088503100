//! Concurrency layer for covenant
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: read set, query set and write set tracking
//! - Snapshot isolation
//! - Conflict detection at commit time, phantoms included
//! - TransactionManager: serialized validate-and-apply commits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod transaction;
pub mod validation;

pub use manager::TransactionManager;
pub use transaction::{
    ApplyResult, CommitError, QueryRead, TransactionContext, TransactionStatus,
};
pub use validation::{
    validate_query_set, validate_read_set, validate_transaction, ConflictType, ValidationResult,
};
