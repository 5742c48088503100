//! Error types for covenant
//!
//! Every failure that can reject a transaction is a [`CovenantError`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Each variant maps to an [`ErrorKind`]. The kind decides whether the error's
//! message may be shown to the caller (`is_responsible`) or must be replaced
//! by a generic message at the response boundary.
//!
//! | Category | Kinds | Exposed |
//! |----------|-------|---------|
//! | Validation | `InvalidSignerCount`, `InvalidInput`, `UnknownFunction` | yes |
//! | Lookup | `NotFound` | yes |
//! | State machine | `AlreadyExecuted` .. `AlreadyFinished` | yes |
//! | Access | `AccessDenied`, `Identity` | yes |
//! | Callback | `CallbackFailure` | yes |
//! | Infrastructure | `IdCollision`, `Storage`, `Serialization`, `TransactionAborted`, `Internal` | no |

use thiserror::Error;

use crate::types::{ApplicationId, ContractId, SignerId};

/// Result type alias for covenant operations
pub type CovenantResult<T> = std::result::Result<T, CovenantError>;

/// Error types for the contract workflow
#[derive(Debug, Error)]
pub enum CovenantError {
    /// Signer set size outside the allowed range
    #[error("invalid signer count: {count} (allowed {min}..={max})")]
    InvalidSignerCount {
        /// Distinct signers requested, creator counted
        count: usize,
        /// Minimum allowed
        min: usize,
        /// Maximum allowed
        max: usize,
    },

    /// A record already exists for a freshly derived contract id
    #[error("contract ID collided: {id}")]
    IdCollision {
        /// The colliding id
        id: ContractId,
    },

    /// No record for this (contract, signer) pair
    #[error("the contract [{id}] for the signer [{signer}] does not exist")]
    NotFound {
        /// Contract id looked up
        id: ContractId,
        /// Signer looked up
        signer: SignerId,
    },

    /// Contract already executed
    #[error("already executed")]
    AlreadyExecuted,

    /// Contract already canceled
    #[error("already canceled")]
    AlreadyCanceled,

    /// Contract expiry time has passed
    #[error("already expired")]
    AlreadyExpired,

    /// This signer already approved
    #[error("already approved")]
    AlreadyApproved,

    /// This signer already disapproved
    #[error("already disapproved")]
    AlreadyDisapproved,

    /// Contract already finished (expired, executed or canceled)
    #[error("already finished contract")]
    AlreadyFinished,

    /// Calling application may not perform this operation
    #[error("invalid access: {reason}")]
    AccessDenied {
        /// Why access was refused
        reason: String,
    },

    /// Caller identity could not be resolved
    #[error("identity error: {reason}")]
    Identity {
        /// Resolver message
        reason: String,
    },

    /// Malformed request parameters
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong
        reason: String,
    },

    /// Route name not in the routing table
    #[error("unknown function: [{name}]")]
    UnknownFunction {
        /// The requested route
        name: String,
    },

    /// Owning application's callback returned a failure
    #[error("callback to [{application}] failed: {message}")]
    CallbackFailure {
        /// Application that was invoked
        application: ApplicationId,
        /// Message returned by the application
        message: String,
    },

    /// Record store failure (get/put/query)
    #[error("storage error: {message}")]
    Storage {
        /// Description of the failed operation
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Record encode/decode failure
    #[error("serialization error: {reason}")]
    Serialization {
        /// Codec message
        reason: String,
    },

    /// Transaction rejected at commit (optimistic conflict or invalid state)
    #[error("transaction aborted: {reason}")]
    TransactionAborted {
        /// Why the commit failed
        reason: String,
    },

    /// Bug or invariant violation
    #[error("internal error: {reason}")]
    Internal {
        /// Description
        reason: String,
    },
}

/// Discriminant of [`CovenantError`], carrying the exposure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CovenantError::InvalidSignerCount`]
    InvalidSignerCount,
    /// See [`CovenantError::IdCollision`]
    IdCollision,
    /// See [`CovenantError::NotFound`]
    NotFound,
    /// See [`CovenantError::AlreadyExecuted`]
    AlreadyExecuted,
    /// See [`CovenantError::AlreadyCanceled`]
    AlreadyCanceled,
    /// See [`CovenantError::AlreadyExpired`]
    AlreadyExpired,
    /// See [`CovenantError::AlreadyApproved`]
    AlreadyApproved,
    /// See [`CovenantError::AlreadyDisapproved`]
    AlreadyDisapproved,
    /// See [`CovenantError::AlreadyFinished`]
    AlreadyFinished,
    /// See [`CovenantError::AccessDenied`]
    AccessDenied,
    /// See [`CovenantError::Identity`]
    Identity,
    /// See [`CovenantError::InvalidInput`]
    InvalidInput,
    /// See [`CovenantError::UnknownFunction`]
    UnknownFunction,
    /// See [`CovenantError::CallbackFailure`]
    CallbackFailure,
    /// See [`CovenantError::Storage`]
    StoreFailure,
    /// See [`CovenantError::Serialization`]
    Serialization,
    /// See [`CovenantError::TransactionAborted`]
    TransactionAborted,
    /// See [`CovenantError::Internal`]
    Internal,
}

impl ErrorKind {
    /// Whether the error message is safe to return to the caller verbatim
    pub fn is_responsible(self) -> bool {
        !matches!(
            self,
            ErrorKind::IdCollision
                | ErrorKind::StoreFailure
                | ErrorKind::Serialization
                | ErrorKind::TransactionAborted
                | ErrorKind::Internal
        )
    }

    /// Stable snake_case name, used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidSignerCount => "invalid_signer_count",
            ErrorKind::IdCollision => "id_collision",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExecuted => "already_executed",
            ErrorKind::AlreadyCanceled => "already_canceled",
            ErrorKind::AlreadyExpired => "already_expired",
            ErrorKind::AlreadyApproved => "already_approved",
            ErrorKind::AlreadyDisapproved => "already_disapproved",
            ErrorKind::AlreadyFinished => "already_finished",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::Identity => "identity",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::UnknownFunction => "unknown_function",
            ErrorKind::CallbackFailure => "callback_failure",
            ErrorKind::StoreFailure => "store_failure",
            ErrorKind::Serialization => "serialization",
            ErrorKind::TransactionAborted => "transaction_aborted",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CovenantError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CovenantError::InvalidSignerCount { .. } => ErrorKind::InvalidSignerCount,
            CovenantError::IdCollision { .. } => ErrorKind::IdCollision,
            CovenantError::NotFound { .. } => ErrorKind::NotFound,
            CovenantError::AlreadyExecuted => ErrorKind::AlreadyExecuted,
            CovenantError::AlreadyCanceled => ErrorKind::AlreadyCanceled,
            CovenantError::AlreadyExpired => ErrorKind::AlreadyExpired,
            CovenantError::AlreadyApproved => ErrorKind::AlreadyApproved,
            CovenantError::AlreadyDisapproved => ErrorKind::AlreadyDisapproved,
            CovenantError::AlreadyFinished => ErrorKind::AlreadyFinished,
            CovenantError::AccessDenied { .. } => ErrorKind::AccessDenied,
            CovenantError::Identity { .. } => ErrorKind::Identity,
            CovenantError::InvalidInput { .. } => ErrorKind::InvalidInput,
            CovenantError::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            CovenantError::CallbackFailure { .. } => ErrorKind::CallbackFailure,
            CovenantError::Storage { .. } => ErrorKind::StoreFailure,
            CovenantError::Serialization { .. } => ErrorKind::Serialization,
            CovenantError::TransactionAborted { .. } => ErrorKind::TransactionAborted,
            CovenantError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the message is safe to expose to the caller
    pub fn is_responsible(&self) -> bool {
        self.kind().is_responsible()
    }

    /// Whether this is an optimistic-concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, CovenantError::TransactionAborted { .. })
    }

    /// Storage error without an underlying cause
    pub fn storage(message: impl Into<String>) -> Self {
        CovenantError::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Storage error wrapping a cause
    pub fn storage_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CovenantError::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Invalid input helper
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CovenantError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Access denied helper
    pub fn access_denied(reason: impl Into<String>) -> Self {
        CovenantError::AccessDenied {
            reason: reason.into(),
        }
    }

    /// Internal error helper
    pub fn internal(reason: impl Into<String>) -> Self {
        CovenantError::Internal {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CovenantError {
    fn from(e: serde_json::Error) -> Self {
        CovenantError::Serialization {
            reason: e.to_string(),
        }
    }
}
