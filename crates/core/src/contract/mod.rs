//! Contract entity types
//!
//! A contract is one logical agreement stored as N records, one per signer.
//!
//! ## Module Structure
//!
//! - `record`: the per-signer `Contract` record and its JSON codec
//! - `sign`: the signer-private sub-state of a record
//! - `signer_set`: deduplicated, ordered signer set
//! - `timestamp`: transaction timestamps and their wire format
//!
//! ## Usage
//!
//! ```
//! use covenant_core::contract::{Contract, Sign, SignerSet, Timestamp};
//! ```

pub mod record;
pub mod sign;
pub mod signer_set;
pub mod timestamp;

// Re-exports
pub use record::{Contract, FIELD_ID};
pub use sign::Sign;
pub use signer_set::SignerSet;
pub use timestamp::Timestamp;
