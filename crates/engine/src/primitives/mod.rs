//! Contract primitive for Covenant
//!
//! `ContractStore` is a stateless facade over the Database engine. It holds
//! only an `Arc<Database>`; all state lives in storage. Multiple instances
//! on the same Database are safe.
//!
//! ## Sharing a Transaction
//!
//! Contract operations can be combined with other work in one transaction
//! through the extension trait:
//!
//! ```rust,ignore
//! use covenant_engine::primitives::extensions::*;
//!
//! db.transaction(|txn| {
//!     let update = txn.contract_disapprove(&id, &signer, now)?;
//!     notify_owner(&update.contract)?;
//!     Ok(update.contract)
//! })?;
//! ```

pub mod contract;
pub mod extensions;
pub mod query_builder;

pub use contract::{contract_id, ContractPage, ContractStore, ContractUpdate, NewContract};
pub use extensions::ContractStoreExt;
pub use query_builder::ListMode;
