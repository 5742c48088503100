//! Contract command handlers.
//!
//! Each handler resolves what it needs from the [`Invocation`] and runs its
//! work in exactly one database transaction. Application callbacks happen
//! inside that transaction: a failed callback aborts the approval or
//! disapproval that triggered it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use covenant_core::{
    ApplicationId, Contract, ContractId, CovenantError, CovenantResult, SignerId, SignerSet,
};
use covenant_engine::{ContractStoreExt, Database, ListMode, NewContract};

use crate::{Invocation, Output};

/// Callback function run on the owning application at execution
pub const EXECUTE_FUNCTION: &str = "contract/execute";

/// Callback function run on the owning application at disapproval
pub const CANCEL_FUNCTION: &str = "contract/cancel";

/// Calling application, provided it is not one of the engine's own ids
fn foreign_application(db: &Database, inv: &dyn Invocation) -> CovenantResult<ApplicationId> {
    match inv.calling_application() {
        Ok(app) if !db.config().is_self_application(app.as_str()) => Ok(app),
        Ok(app) => Err(CovenantError::access_denied(format!(
            "calls from [{}] are not accepted",
            app
        ))),
        Err(e) => Err(CovenantError::access_denied(format!(
            "calling application unknown: {}",
            e
        ))),
    }
}

/// Invoke `function` on the contract's owning application
///
/// Returns the reply payload; any status but 200 is a `CallbackFailure`.
fn run_callback(inv: &dyn Invocation, contract: &Contract, function: &str) -> CovenantResult<Vec<u8>> {
    let args = vec![
        function.as_bytes().to_vec(),
        contract.id.as_str().as_bytes().to_vec(),
        contract.document.as_bytes().to_vec(),
    ];
    let response = inv.invoke_application(&contract.application_id, &args);
    debug!(
        target: "covenant::executor",
        application = %contract.application_id,
        function,
        status = response.status,
        "Application callback returned"
    );
    if response.is_ok() {
        Ok(response.payload)
    } else {
        Err(CovenantError::CallbackFailure {
            application: contract.application_id.clone(),
            message: response.message,
        })
    }
}

/// Handle Create command.
pub fn create(
    db: &Database,
    inv: &dyn Invocation,
    document: String,
    expiry_secs: i64,
    signers: Vec<SignerId>,
) -> CovenantResult<Output> {
    let application_id = foreign_application(db, inv)?;
    let creator = inv.caller(true)?;
    let now = inv.tx_timestamp();
    let request = NewContract {
        application_id,
        document,
        signers: SignerSet::with_signers(creator, signers),
        expiry_secs,
    };
    let limits = &db.config().limits;
    let contract = db.transaction(|txn| txn.contract_create(inv.tx_id(), now, request, limits))?;
    Ok(Output::Contract(contract))
}

/// Handle Approve command.
///
/// On quorum the owning application's execute callback runs and its payload
/// is attached, base64-encoded, to the returned record only.
pub fn approve(db: &Database, inv: &dyn Invocation, id: ContractId) -> CovenantResult<Output> {
    let signer = inv.caller(true)?;
    let now = inv.tx_timestamp();
    let contract = db.transaction(|txn| {
        let mut contract = txn.contract_approve(&id, &signer, now)?.contract;
        if contract.executed_time.is_some() {
            let payload = run_callback(inv, &contract, EXECUTE_FUNCTION)?;
            contract.callback = Some(STANDARD.encode(payload));
        }
        Ok(contract)
    })?;
    Ok(Output::Contract(contract))
}

/// Handle Disapprove command.
pub fn disapprove(db: &Database, inv: &dyn Invocation, id: ContractId) -> CovenantResult<Output> {
    let signer = inv.caller(true)?;
    let now = inv.tx_timestamp();
    let contract = db.transaction(|txn| {
        let contract = txn.contract_disapprove(&id, &signer, now)?.contract;
        run_callback(inv, &contract, CANCEL_FUNCTION)?;
        Ok(contract)
    })?;
    Ok(Output::Contract(contract))
}

/// Handle Cancel command.
///
/// Only the contract's owning application may cancel, and never through
/// one of the engine's own ids.
pub fn cancel(db: &Database, inv: &dyn Invocation, id: ContractId) -> CovenantResult<Output> {
    let application = foreign_application(db, inv)?;
    let signer = inv.caller(true)?;
    let now = inv.tx_timestamp();
    let contract = db.transaction(|txn| {
        let contract = txn.contract_get(&id, &signer)?;
        if contract.application_id != application {
            return Err(CovenantError::access_denied(format!(
                "contract is owned by [{}]",
                contract.application_id
            )));
        }
        Ok(txn.contract_cancel(&id, &signer, now)?.contract)
    })?;
    Ok(Output::Contract(contract))
}

/// Handle Get command.
pub fn get(db: &Database, inv: &dyn Invocation, id: ContractId) -> CovenantResult<Output> {
    let signer = inv.caller(false)?;
    let contract = db.transaction(|txn| txn.contract_get(&id, &signer))?;
    Ok(Output::Contract(contract))
}

/// Handle List command.
pub fn list(
    db: &Database,
    inv: &dyn Invocation,
    application_id: ApplicationId,
    mode: Option<String>,
    bookmark: Option<String>,
) -> CovenantResult<Output> {
    let signer = inv.caller(false)?;
    let mode = ListMode::from_option(mode.as_deref());
    let query = mode.query(&signer, &application_id, inv.tx_timestamp());
    let page_size = db.config().page_size;
    let page = db.transaction(|txn| txn.contract_list(&query, page_size, bookmark.as_deref()))?;
    Ok(Output::Contracts(page))
}
