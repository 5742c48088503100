//! Command enum defining all workflow operations.
//!
//! Every route of the routing table parses into one variant. Commands are
//! self-contained and serializable; the caller identity, calling application
//! and transaction time come from the [`Invocation`](crate::Invocation), not
//! from the command.

use serde::{Deserialize, Serialize};

use covenant_core::{ApplicationId, ContractId, SignerId};

/// A parsed workflow call
///
/// # Example
///
/// ```
/// use covenant_executor::{Command, Route};
///
/// let cmd = Route::from_name("approve")
///     .and_then(|route| route.parse(&["c1".to_string()]))
///     .unwrap();
/// assert!(matches!(cmd, Command::Approve { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Propose a contract; the caller is the creator.
    /// Returns: `Output::Contract` (creator's record)
    Create {
        document: String,
        expiry_secs: i64,
        signers: Vec<SignerId>,
    },

    /// Approve as the caller.
    /// Returns: `Output::Contract`, with `callback` set if this executed it
    Approve { id: ContractId },

    /// Disapprove as the caller.
    /// Returns: `Output::Contract`
    Disapprove { id: ContractId },

    /// Cancel from the owning application.
    /// Returns: `Output::Contract`
    Cancel { id: ContractId },

    /// Read the caller's record.
    /// Returns: `Output::Contract`
    Get { id: ContractId },

    /// List the caller's contracts under an application.
    /// Returns: `Output::Contracts`
    List {
        application_id: ApplicationId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bookmark: Option<String>,
    },

    /// Returns: `Output::Version`
    Version,
}

impl Command {
    /// Whether the command writes
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::Approve { .. }
                | Command::Disapprove { .. }
                | Command::Cancel { .. }
        )
    }
}
