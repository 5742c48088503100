//! Transaction extension traits for contract operations
//!
//! Extension traits let contract operations and other work (such as an
//! application callback) share one transaction. Each method operates on a
//! `TransactionContext`; nothing is visible until the transaction commits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use covenant_engine::primitives::extensions::ContractStoreExt;
//!
//! db.transaction(|txn| {
//!     let update = txn.contract_approve(&id, &signer, now)?;
//!     if update.contract.executed_time.is_some() {
//!         // invoke the owning application here; an error aborts everything
//!     }
//!     Ok(update.contract)
//! })?;
//! ```
//!
//! The standalone [`ContractStore`](super::contract::ContractStore) API
//! delegates to these same methods, one transaction per call.

use covenant_core::{ContractId, CovenantResult, Limits, Query, SignerId, Timestamp};
use covenant_core::Contract;

use super::contract::{ContractPage, ContractUpdate, NewContract};

/// Contract operations within a transaction
///
/// Implemented for `TransactionContext` in `contract.rs`
pub trait ContractStoreExt {
    /// Read `signer`'s record of contract `id`
    ///
    /// Fails with `NotFound` if there is no such record.
    fn contract_get(&mut self, id: &ContractId, signer: &SignerId) -> CovenantResult<Contract>;

    /// Buffer a write of one record under its own key
    fn contract_put(&mut self, contract: &Contract) -> CovenantResult<()>;

    /// All stored sibling records of contract `id`, decoded
    fn contract_siblings(&mut self, id: &ContractId) -> CovenantResult<Vec<Contract>>;

    /// Rewrite every sibling from `updater`, keeping each sibling's own sign
    ///
    /// Returns the number of records written.
    fn contract_fan_out(&mut self, updater: &Contract) -> CovenantResult<usize>;

    /// Create a contract; returns the creator's record
    fn contract_create(
        &mut self,
        tx_id: &str,
        now: Timestamp,
        request: NewContract,
        limits: &Limits,
    ) -> CovenantResult<Contract>;

    /// Approve as `signer`, executing the contract on quorum
    fn contract_approve(
        &mut self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate>;

    /// Disapprove as `signer`, canceling the contract
    fn contract_disapprove(
        &mut self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate>;

    /// Cancel an unfinished contract through `signer`'s record
    fn contract_cancel(
        &mut self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate>;

    /// One page of a listing query
    fn contract_list(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<ContractPage>;
}
