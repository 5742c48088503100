//! Contract record and its codec
//!
//! A contract is materialized as one record per signer. All copies carry the
//! same shared fields; only [`Sign`] differs.
//!
//! ## Persisted format
//!
//! JSON object. Optional fields are omitted when absent, never written as
//! `null`, so `$exists` selectors stay meaningful. The contract id is stored
//! under `@contract`, which also marks the document type.
//!
//! ```text
//! {
//!   "@contract": "9f2c…",
//!   "creator": "alice",
//!   "signers_count": 3,
//!   "approved_count": 1,
//!   "application_id": "escrow",
//!   "document": "{\"amount\":10}",
//!   "created_time": "2026-10-18T09:30:00.000000Z",
//!   "updated_time": "2026-10-18T09:30:00.000000Z",
//!   "expiry_time": "2026-11-02T09:30:00.000000Z",
//!   "finished_time": "2026-11-02T09:30:00.000000Z",
//!   "sign": { "signer": "bob" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::{Sign, Timestamp};
use crate::error::{CovenantError, CovenantResult};
use crate::types::{record_key, ApplicationId, ContractId, SignerId};

/// JSON field holding the contract id (also the document-type tag)
pub const FIELD_ID: &str = "@contract";

/// One signer's copy of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Contract id, shared by all copies
    #[serde(rename = "@contract")]
    pub id: ContractId,
    /// Identity that proposed the contract
    pub creator: SignerId,
    /// Size of the signer set, immutable
    pub signers_count: usize,
    /// Signers who approved so far (creator included)
    pub approved_count: usize,
    /// Owning application, target of execute/cancel callbacks
    pub application_id: ApplicationId,
    /// Opaque agreed-upon payload
    pub document: String,
    /// Base64 result of the execute callback (response only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<Timestamp>,
    /// Time of the latest change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<Timestamp>,
    /// Deadline for signing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<Timestamp>,
    /// Set when the quorum is reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_time: Option<Timestamp>,
    /// Set by a disapproval or a direct cancel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_time: Option<Timestamp>,
    /// Expiry, execution or cancellation time, whichever applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_time: Option<Timestamp>,
    /// This record's signer and their action
    pub sign: Sign,
}

impl Contract {
    /// Storage key of this record
    pub fn key(&self) -> String {
        record_key(&self.id, &self.sign.signer)
    }

    /// Whether `signer` is this record's signer
    pub fn is_signed_by(&self, signer: &SignerId) -> bool {
        &self.sign.signer == signer
    }

    /// Quorum reached: every signer approved
    pub fn is_quorum(&self) -> bool {
        self.approved_count == self.signers_count
    }

    /// Check that this record's signer may still approve or disapprove
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// executed, canceled, expired, approved, disapproved.
    pub fn assert_signable(&self, now: Timestamp) -> CovenantResult<()> {
        if self.executed_time.is_some() {
            return Err(CovenantError::AlreadyExecuted);
        }
        if self.canceled_time.is_some() {
            return Err(CovenantError::AlreadyCanceled);
        }
        if matches!(self.expiry_time, Some(expiry) if now >= expiry) {
            return Err(CovenantError::AlreadyExpired);
        }
        if self.sign.approved_time.is_some() {
            return Err(CovenantError::AlreadyApproved);
        }
        if self.sign.disapproved_time.is_some() {
            return Err(CovenantError::AlreadyDisapproved);
        }
        Ok(())
    }

    /// Finished: executed, canceled, or `now >= finished_time`
    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.executed_time.is_some()
            || self.canceled_time.is_some()
            || matches!(self.finished_time, Some(finished) if now >= finished)
    }

    /// Copy of this record's shared fields combined with another signer's `sign`
    pub fn with_sign(&self, sign: Sign) -> Contract {
        Contract {
            sign,
            ..self.clone()
        }
    }

    /// Encode to the persisted JSON bytes
    pub fn to_bytes(&self) -> CovenantResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CovenantError::Serialization {
            reason: format!("failed to marshal the contract: {}", e),
        })
    }

    /// Decode from persisted JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> CovenantResult<Contract> {
        serde_json::from_slice(bytes).map_err(|e| CovenantError::Serialization {
            reason: format!("failed to unmarshal the contract: {}", e),
        })
    }
}
