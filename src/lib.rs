//! Covenant - multi-party contract approval over a transactional record store
//!
//! A contract is proposed by one signer, stored as one record per signer,
//! and approved or disapproved by each of them. Once every signer approves
//! it executes; one disapproval cancels it. Every change is fanned out to
//! all sibling records inside a single transaction.
//!
//! # Quick Start
//!
//! ```
//! use covenant::{Database, Executor, StaticInvocation, Timestamp};
//!
//! let executor = Executor::new(Database::ephemeral());
//! let now = Timestamp::from_secs(1_700_000_000);
//!
//! let inv = StaticInvocation::new("tx-1", now, "alice").with_application("escrow");
//! let params: Vec<String> = ["D", "0", "bob"].iter().map(|s| s.to_string()).collect();
//! let created = executor.invoke("create", &params, &inv);
//! assert!(created.is_ok());
//! ```
//!
//! # Architecture
//!
//! All host calls go through the [`Executor`], which routes them to the
//! contract handlers. The engine ([`Database`], [`ContractStore`]) and the
//! record types are re-exported for embedding and inspection.

// Re-export the public API from covenant-executor
pub use covenant_executor::*;

pub use covenant_core::{
    record_key, ApplicationId, Contract, ContractId, CovenantError, CovenantResult, ErrorKind,
    Limits, Sign, SignerId, SignerSet, Timestamp,
};
pub use covenant_engine::{
    contract_id, ContractPage, ContractStore, ContractUpdate, CovenantConfig, Database, ListMode,
    NewContract,
};
