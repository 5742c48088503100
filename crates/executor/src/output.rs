//! Output enum for command execution results.
//!
//! Each [`Command`](crate::Command) variant maps to exactly one `Output`
//! variant. [`Output::to_payload`] renders the bytes returned to the host.

use serde::Serialize;

use covenant_core::{Contract, CovenantResult};
use covenant_engine::ContractPage;

/// Successful command execution results.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// One contract record (create, approve, disapprove, cancel, get)
    Contract(Contract),

    /// One listing page (list)
    Contracts(ContractPage),

    /// Version string (ver)
    Version(String),
}

impl Output {
    /// Response payload: JSON for records and pages, raw text for the version
    ///
    /// # Errors
    /// `Serialization` if a record cannot be encoded.
    pub fn to_payload(&self) -> CovenantResult<Vec<u8>> {
        match self {
            Output::Contract(contract) => contract.to_bytes(),
            Output::Contracts(page) => Ok(serde_json::to_vec(page)?),
            Output::Version(version) => Ok(version.clone().into_bytes()),
        }
    }

    /// The contract, for record outputs
    pub fn as_contract(&self) -> Option<&Contract> {
        match self {
            Output::Contract(contract) => Some(contract),
            _ => None,
        }
    }

    /// The page, for listing outputs
    pub fn as_page(&self) -> Option<&ContractPage> {
        match self {
            Output::Contracts(page) => Some(page),
            _ => None,
        }
    }
}
