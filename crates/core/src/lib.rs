//! Core types and traits for Covenant
//!
//! This crate defines the foundational types used throughout the system:
//! - Contract, Sign: the per-signer contract record and its codec
//! - SignerSet: deduplicated signer set, creator included
//! - Timestamp: transaction time and its RFC 3339 wire format
//! - ContractId, SignerId, ApplicationId: identifiers and record keys
//! - Limits: signer range and expiry policy
//! - Query, Selector: record store query model
//! - Traits: Storage and SnapshotView
//! - Error: CovenantError and its exposure policy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod limits;
pub mod query;
pub mod traits;
pub mod types;

pub use contract::{Contract, Sign, SignerSet, Timestamp, FIELD_ID};
pub use error::{CovenantError, CovenantResult, ErrorKind};
pub use limits::Limits;
pub use query::{Condition, IndexHint, Query, QueryMetadata, Selector, SortField, SortOrder};
pub use traits::{QueryPage, SnapshotView, Storage, VersionedValue};
pub use types::{record_key, ApplicationId, ContractId, SignerId};
