//! Identifier types
//!
//! - `ContractId`: id shared by every per-signer copy of one contract
//! - `SignerId`: identity of a signer (also used for the caller and creator)
//! - `ApplicationId`: identity of an owning or calling application
//! - `record_key`: storage key of one (contract, signer) record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every contract record key
pub const RECORD_KEY_PREFIX: &str = "CTR_";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwrap into the raw identifier
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Contract identifier (hex digest of creator and transaction id)
    ContractId
);

string_id!(
    /// Signer identity
    SignerId
);

string_id!(
    /// Application identity (owning application or calling application)
    ApplicationId
);

/// Storage key of the record holding `signer`'s copy of contract `id`
///
/// ```
/// use covenant_core::types::{record_key, ContractId, SignerId};
///
/// let key = record_key(&ContractId::new("abc"), &SignerId::new("alice"));
/// assert_eq!(key, "CTR_abc_alice");
/// ```
pub fn record_key(id: &ContractId, signer: &SignerId) -> String {
    format!("{}{}_{}", RECORD_KEY_PREFIX, id, signer)
}
