//! Transaction validation for OCC
//!
//! Rules:
//! - First-committer-wins based on what the transaction READ, not what it wrote
//! - Blind writes (write without read) do NOT conflict
//! - A full query conflicts when re-running it yields a different
//!   `(key, version)` list: a row changed, appeared or disappeared
//! - Read-only transactions always commit

use std::collections::HashMap;

use covenant_core::{CovenantError, CovenantResult, Storage};

use crate::transaction::{QueryRead, TransactionContext};

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Read-write conflict: key was read at one version but current version differs
    ReadWriteConflict {
        /// The key that has a conflict
        key: String,
        /// Version recorded in read_set when read
        read_version: u64,
        /// Current version in storage at validation time
        current_version: u64,
    },

    /// Phantom: a query's result set changed since it ran
    PhantomConflict {
        /// The query, rendered as JSON
        query: String,
        /// Rows seen by the transaction
        read_rows: usize,
        /// Rows the query returns now
        current_rows: usize,
    },
}

/// Result of transaction validation
///
/// Accumulates all conflicts found during validation.
/// A transaction commits only if is_valid() returns true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Validate the read-set against current storage state
///
/// For each key in read_set, the current version must equal the version read.
pub fn validate_read_set<S: Storage + ?Sized>(
    read_set: &HashMap<String, u64>,
    store: &S,
) -> CovenantResult<ValidationResult> {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = match store.get(key) {
            Ok(Some(vv)) => vv.version,
            Ok(None) => 0,
            Err(e) => {
                return Err(CovenantError::internal(format!(
                    "Storage error during read-set validation for key {}: {}",
                    key, e
                )));
            }
        };

        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    Ok(result)
}

/// Re-run every tracked query and compare fingerprints
pub fn validate_query_set<S: Storage + ?Sized>(
    query_set: &[QueryRead],
    store: &S,
) -> CovenantResult<ValidationResult> {
    let mut result = ValidationResult::ok();

    for read in query_set {
        let current = store.query(&read.query).map_err(|e| {
            CovenantError::internal(format!("Storage error during query validation: {}", e))
        })?;
        let unchanged = current.len() == read.fingerprint.len()
            && current
                .iter()
                .zip(read.fingerprint.iter())
                .all(|((key, vv), (seen_key, seen_version))| {
                    key == seen_key && vv.version == *seen_version
                });
        if !unchanged {
            result.conflicts.push(ConflictType::PhantomConflict {
                query: read.query.to_json().to_string(),
                read_rows: read.fingerprint.len(),
                current_rows: current.len(),
            });
        }
    }

    Ok(result)
}

/// Validate a complete transaction against current storage state
///
/// Read-only transactions skip validation entirely.
pub fn validate_transaction<S: Storage + ?Sized>(
    txn: &TransactionContext,
    store: &S,
) -> CovenantResult<ValidationResult> {
    if txn.is_read_only() {
        return Ok(ValidationResult::ok());
    }

    let mut result = ValidationResult::ok();
    result.merge(validate_read_set(&txn.read_set, store)?);
    result.merge(validate_query_set(&txn.query_set, store)?);
    Ok(result)
}
