//! ContractStore: multi-party contract records
//!
//! ## Design
//!
//! A contract is stored as one record per signer under
//! `CTR_{id}_{signer}`. The copies share every field except `sign`. Each
//! state change mutates the acting signer's record and then fans out: every
//! sibling is rewritten with the new shared fields and its own stored
//! `sign`. All writes of one operation land in one transaction, so the
//! siblings never disagree.
//!
//! `ContractStore` is a stateless facade over [`Database`]. Its methods
//! delegate to [`ContractStoreExt`], which callers use directly when an
//! operation must share a transaction with other work.
//!
//! ## State machine
//!
//! - create: creator's record approved, `approved_count = 1`
//! - approve: `approved_count += 1`; quorum sets `executed_time`
//! - disapprove: cancels the whole contract
//! - cancel: no signability check, only "not finished"

use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use covenant_concurrency::TransactionContext;
use covenant_core::{
    ApplicationId, Contract, ContractId, CovenantError, CovenantResult, Limits, Query,
    QueryMetadata, Sign, SignerId, SignerSet, Timestamp,
};

use super::extensions::ContractStoreExt;
use super::query_builder::{self, ListMode};
use crate::database::Database;

/// Derive a contract id: hex SHA-256 of creator then transaction id
///
/// ```
/// use covenant_core::SignerId;
/// use covenant_engine::primitives::contract::contract_id;
///
/// let id = contract_id(&SignerId::new("alice"), "tx-1");
/// assert_eq!(id.as_str().len(), 64);
/// assert_eq!(id, contract_id(&SignerId::new("alice"), "tx-1"));
/// ```
pub fn contract_id(creator: &SignerId, tx_id: &str) -> ContractId {
    let mut hasher = Sha256::new();
    hasher.update(creator.as_str().as_bytes());
    hasher.update(tx_id.as_bytes());
    let digest = hasher.finalize();
    ContractId::new(digest.iter().map(|b| format!("{:02x}", b)).collect::<String>())
}

/// Parameters of a new contract
#[derive(Debug, Clone)]
pub struct NewContract {
    /// Owning application
    pub application_id: ApplicationId,
    /// Agreed-upon payload
    pub document: String,
    /// Creator plus the other signers
    pub signers: SignerSet,
    /// Requested lifetime; short or negative values take the default
    pub expiry_secs: i64,
}

/// Result of a mutating operation
#[derive(Debug, Clone)]
pub struct ContractUpdate {
    /// The acting signer's record after the change
    pub contract: Contract,
    /// Sibling records rewritten by the fan-out
    pub records_written: usize,
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct ContractPage {
    /// Count and next bookmark
    pub meta: QueryMetadata,
    /// Records in query order
    pub records: Vec<Contract>,
}

impl ContractStoreExt for TransactionContext {
    fn contract_get(&mut self, id: &ContractId, signer: &SignerId) -> CovenantResult<Contract> {
        let key = covenant_core::record_key(id, signer);
        match self.get(&key)? {
            Some(bytes) => Contract::from_bytes(&bytes),
            None => Err(CovenantError::NotFound {
                id: id.clone(),
                signer: signer.clone(),
            }),
        }
    }

    fn contract_put(&mut self, contract: &Contract) -> CovenantResult<()> {
        self.put(contract.key(), contract.to_bytes()?)
    }

    fn contract_siblings(&mut self, id: &ContractId) -> CovenantResult<Vec<Contract>> {
        self.query(&query_builder::by_id(id))?
            .iter()
            .map(|(_, bytes)| Contract::from_bytes(bytes))
            .collect()
    }

    fn contract_fan_out(&mut self, updater: &Contract) -> CovenantResult<usize> {
        let siblings = self.contract_siblings(&updater.id)?;
        let mut written = 0;
        for sibling in siblings {
            let mut record = if sibling.sign.signer == updater.sign.signer {
                updater.clone()
            } else {
                updater.with_sign(sibling.sign)
            };
            record.callback = None;
            self.contract_put(&record)?;
            written += 1;
        }
        debug!(
            target: "covenant::engine",
            id = %updater.id,
            updater = %updater.sign.signer,
            written,
            "Fanned out contract update"
        );
        Ok(written)
    }

    fn contract_create(
        &mut self,
        tx_id: &str,
        now: Timestamp,
        request: NewContract,
        limits: &Limits,
    ) -> CovenantResult<Contract> {
        let NewContract {
            application_id,
            document,
            signers,
            expiry_secs,
        } = request;
        limits.validate_signer_count(signers.len())?;

        let expiry = limits.expiry_time(now, expiry_secs);
        let creator = signers.creator().clone();
        let id = contract_id(&creator, tx_id);
        if !self.query(&query_builder::by_id(&id))?.is_empty() {
            return Err(CovenantError::IdCollision { id });
        }

        let shared = Contract {
            id,
            creator: creator.clone(),
            signers_count: signers.len(),
            approved_count: 1,
            application_id,
            document,
            callback: None,
            created_time: Some(now),
            updated_time: Some(now),
            expiry_time: Some(expiry),
            executed_time: None,
            canceled_time: None,
            finished_time: Some(expiry),
            sign: Sign::new(creator.clone()),
        };

        let mut created = None;
        for signer in signers.iter() {
            let mut sign = Sign::new(signer.clone());
            if *signer == creator {
                sign.approved_time = Some(now);
            }
            let record = shared.with_sign(sign);
            self.contract_put(&record)?;
            if *signer == creator {
                created = Some(record);
            }
        }

        let contract =
            created.ok_or_else(|| CovenantError::internal("creator missing from signer set"))?;
        info!(
            target: "covenant::engine",
            id = %contract.id,
            creator = %contract.creator,
            application = %contract.application_id,
            signers = contract.signers_count,
            "Contract created"
        );
        Ok(contract)
    }

    fn contract_approve(
        &mut self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate> {
        let mut contract = self.contract_get(id, signer)?;
        contract.assert_signable(now)?;

        contract.sign.approved_time = Some(now);
        contract.updated_time = Some(now);
        contract.approved_count += 1;
        if contract.is_quorum() {
            contract.executed_time = Some(now);
            contract.finished_time = Some(now);
            info!(target: "covenant::engine", id = %contract.id, "Contract executed");
        }

        let records_written = self.contract_fan_out(&contract)?;
        Ok(ContractUpdate {
            contract,
            records_written,
        })
    }

    fn contract_disapprove(
        &mut self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate> {
        let mut contract = self.contract_get(id, signer)?;
        contract.assert_signable(now)?;

        contract.sign.disapproved_time = Some(now);
        contract.canceled_time = Some(now);
        contract.finished_time = Some(now);
        contract.updated_time = Some(now);
        info!(
            target: "covenant::engine",
            id = %contract.id,
            signer = %signer,
            "Contract canceled by disapproval"
        );

        let records_written = self.contract_fan_out(&contract)?;
        Ok(ContractUpdate {
            contract,
            records_written,
        })
    }

    fn contract_cancel(
        &mut self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate> {
        let mut contract = self.contract_get(id, signer)?;
        if contract.is_finished(now) {
            return Err(CovenantError::AlreadyFinished);
        }

        contract.canceled_time = Some(now);
        contract.finished_time = Some(now);
        contract.updated_time = Some(now);
        info!(target: "covenant::engine", id = %contract.id, "Contract canceled");

        let records_written = self.contract_fan_out(&contract)?;
        Ok(ContractUpdate {
            contract,
            records_written,
        })
    }

    fn contract_list(
        &self,
        query: &Query,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> CovenantResult<ContractPage> {
        let page = self.query_page(query, page_size, bookmark.filter(|b| !b.is_empty()))?;
        let records = page
            .records
            .iter()
            .map(|(_, vv)| Contract::from_bytes(&vv.value))
            .collect::<CovenantResult<Vec<_>>>()?;
        Ok(ContractPage {
            meta: page.metadata,
            records,
        })
    }
}

/// Contract primitive
///
/// Stateless facade over Database; every call is one transaction.
///
/// # Example
///
/// ```
/// use covenant_core::{ApplicationId, SignerId, SignerSet, Timestamp};
/// use covenant_engine::primitives::contract::{ContractStore, NewContract};
/// use covenant_engine::Database;
///
/// let store = ContractStore::new(Database::ephemeral());
/// let now = Timestamp::from_secs(1_700_000_000);
/// let signers = SignerSet::with_signers(SignerId::new("alice"), [SignerId::new("bob")]);
/// let request = NewContract {
///     application_id: ApplicationId::new("escrow"),
///     document: "D".to_string(),
///     signers,
///     expiry_secs: 0,
/// };
/// let created = store.create("tx-1", now, request).unwrap();
/// let update = store.approve(&created.id, &SignerId::new("bob"), now).unwrap();
/// assert!(update.contract.executed_time.is_some());
/// ```
#[derive(Clone)]
pub struct ContractStore {
    db: Arc<Database>,
}

impl ContractStore {
    /// Create new ContractStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Underlying database
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Create a contract with the configured limits
    pub fn create(&self, tx_id: &str, now: Timestamp, request: NewContract) -> CovenantResult<Contract> {
        let limits = &self.db.config().limits;
        self.db
            .transaction(|txn| txn.contract_create(tx_id, now, request, limits))
    }

    /// `signer`'s record of contract `id`
    pub fn get(&self, id: &ContractId, signer: &SignerId) -> CovenantResult<Contract> {
        self.db.transaction(|txn| txn.contract_get(id, signer))
    }

    /// Every sibling record of contract `id`
    pub fn siblings(&self, id: &ContractId) -> CovenantResult<Vec<Contract>> {
        self.db.transaction(|txn| txn.contract_siblings(id))
    }

    /// Approve as `signer`
    pub fn approve(
        &self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate> {
        self.db.transaction(|txn| txn.contract_approve(id, signer, now))
    }

    /// Disapprove as `signer`
    pub fn disapprove(
        &self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate> {
        self.db.transaction(|txn| txn.contract_disapprove(id, signer, now))
    }

    /// Cancel through `signer`'s record
    pub fn cancel(
        &self,
        id: &ContractId,
        signer: &SignerId,
        now: Timestamp,
    ) -> CovenantResult<ContractUpdate> {
        self.db.transaction(|txn| txn.contract_cancel(id, signer, now))
    }

    /// One page of `signer`'s contracts under `application`
    pub fn list(
        &self,
        signer: &SignerId,
        application: &ApplicationId,
        mode: ListMode,
        bookmark: Option<&str>,
        now: Timestamp,
    ) -> CovenantResult<ContractPage> {
        let query = mode.query(signer, application, now);
        let page_size = self.db.config().page_size;
        self.db
            .transaction(|txn| txn.contract_list(&query, page_size, bookmark))
    }
}
