//! Signer and expiry limits
//!
//! This module defines the configurable limits enforced when a contract is
//! created. Violations of the signer range result in `InvalidSignerCount`.
//!
//! ## Expiry policy
//!
//! A requested expiry of at least `min_expiry_secs` is honored as-is. Shorter
//! (or negative) requests are not rejected: they fall back to
//! `default_expiry_days`. Expiries past year 9999 saturate at
//! [`Timestamp::MAX`].

use serde::{Deserialize, Serialize};

use crate::contract::Timestamp;
use crate::error::{CovenantError, CovenantResult};

/// Limits applied at contract creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Minimum distinct signers, creator counted (default: 2)
    pub min_signers: usize,

    /// Maximum distinct signers, creator counted (default: 128)
    pub max_signers: usize,

    /// Shortest expiry honored, in seconds (default: 600)
    pub min_expiry_secs: i64,

    /// Expiry used when the request is shorter than `min_expiry_secs` (default: 15)
    pub default_expiry_days: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            min_signers: 2,
            max_signers: 128,
            min_expiry_secs: 600,
            default_expiry_days: 15,
        }
    }
}

impl Limits {
    /// Validate the size of a signer set
    pub fn validate_signer_count(&self, count: usize) -> CovenantResult<()> {
        if count < self.min_signers || count > self.max_signers {
            return Err(CovenantError::InvalidSignerCount {
                count,
                min: self.min_signers,
                max: self.max_signers,
            });
        }
        Ok(())
    }

    /// Expiry time of a contract created at `now` with `requested_secs`
    pub fn expiry_time(&self, now: Timestamp, requested_secs: i64) -> Timestamp {
        if requested_secs >= self.min_expiry_secs && requested_secs > 0 {
            now.add_secs(requested_secs as u64)
        } else {
            now.add_days(self.default_expiry_days)
        }
    }
}
