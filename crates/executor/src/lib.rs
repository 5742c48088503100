//! # Covenant Executor
//!
//! Workflow entry points of the Covenant contract engine.
//!
//! It provides:
//! - [`Executor`] - dispatches host calls to the contract engine
//! - [`Invocation`] - what the host supplies per call (time, identity, callbacks)
//! - [`Command`]/[`Output`] - typed requests and results
//! - [`Response`] - the host-facing result, with the error exposure policy applied
//!
//! ## Quick Start
//!
//! ```
//! use covenant_core::Timestamp;
//! use covenant_engine::Database;
//! use covenant_executor::{Executor, StaticInvocation};
//!
//! let executor = Executor::new(Database::ephemeral());
//! let inv = StaticInvocation::new("tx-1", Timestamp::from_secs(1_700_000_000), "alice");
//!
//! let response = executor.invoke("ver", &[], &inv);
//! assert!(response.payload_str().unwrap().starts_with("Covenant v"));
//! ```
//!
//! ## Routes
//!
//! | Function | Identity | Result |
//! |----------|----------|--------|
//! | `create` | authenticated | creator's record |
//! | `approve` | authenticated | caller's record, `callback` on execution |
//! | `disapprove` | authenticated | caller's record |
//! | `cancel` | authenticated | caller's record |
//! | `get` | any | caller's record |
//! | `list` | any | `{"meta": ..., "records": [...]}` |
//! | `ver` | none | version text |

#![warn(missing_docs)]

mod command;
mod executor;
mod invocation;
mod logging;
mod output;
mod response;
mod router;

// Handler modules
pub mod handlers;

// Test modules
#[cfg(test)]
mod tests;

pub use command::Command;
pub use executor::{Executor, VERSION};
pub use invocation::{
    Invocation, InvokeResponse, RecordedCall, StaticInvocation, STATUS_ERROR, STATUS_OK,
};
pub use logging::init_tracing;
pub use output::Output;
pub use response::{respond_error, Response};
pub use router::Route;
