//! Per-signer private sub-state of a contract record

use serde::{Deserialize, Serialize};

use super::Timestamp;
use crate::types::SignerId;

/// One signer's action on a contract: approve or disapprove
///
/// This is the only part of a contract record that differs between the
/// per-signer copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sign {
    /// Signer owning this record
    pub signer: SignerId,
    /// When this signer approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_time: Option<Timestamp>,
    /// When this signer disapproved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disapproved_time: Option<Timestamp>,
}

impl Sign {
    /// Fresh, unsigned state for `signer`
    pub fn new(signer: SignerId) -> Self {
        Self {
            signer,
            approved_time: None,
            disapproved_time: None,
        }
    }

    /// Neither approved nor disapproved
    pub fn is_unsigned(&self) -> bool {
        self.approved_time.is_none() && self.disapproved_time.is_none()
    }
}
