//! Workflow Comprehensive Test Suite
//!
//! End-to-end coverage of the contract workflow through the public crate:
//! host calls go in through `Executor::invoke`, records are inspected
//! through `ContractStore`.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test workflow_comprehensive
//!
//! # Run the fan-out tests only
//! cargo test --test workflow_comprehensive fan_out::
//! ```

use std::sync::Arc;

use serde_json::Value as JsonValue;

use covenant::{
    ContractId, ContractStore, Database, Executor, Response, SignerId, StaticInvocation, Timestamp,
};

pub const APP: &str = "escrow";

/// Executor and a store view over the same database
pub struct Harness {
    pub executor: Executor,
    pub store: ContractStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_database(Database::ephemeral())
    }

    pub fn with_database(db: Arc<Database>) -> Self {
        Self {
            executor: Executor::new(db.clone()),
            store: ContractStore::new(db),
        }
    }

    /// Call `function` as `caller` from `APP`, `offset_secs` after `t0`
    pub fn call(&self, function: &str, args: &[&str], caller: &str, offset_secs: u64) -> Response {
        let tx_id = format!("{}-{}-{}", function, caller, offset_secs);
        let inv = StaticInvocation::new(tx_id, t0().add_secs(offset_secs), caller).with_application(APP);
        self.executor.invoke(function, &strings(args), &inv)
    }

    /// Successful call, payload decoded as JSON
    pub fn call_ok(&self, function: &str, args: &[&str], caller: &str, offset_secs: u64) -> JsonValue {
        let response = self.call(function, args, caller, offset_secs);
        assert!(response.is_ok(), "{} by {} failed: {}", function, caller, response.message);
        serde_json::from_slice(&response.payload).unwrap()
    }

    /// Create as `creator` with `others` at `t0`; returns the contract id
    pub fn create(&self, creator: &str, others: &[&str], expiry: &str) -> ContractId {
        let mut args = vec!["D", expiry];
        args.extend_from_slice(others);
        let record = self.call_ok("create", &args, creator, 0);
        ContractId::new(record["@contract"].as_str().unwrap())
    }

    /// Every record of `id`, as stored
    pub fn siblings(&self, id: &ContractId) -> Vec<covenant::Contract> {
        self.store.siblings(id).unwrap()
    }
}

pub fn t0() -> Timestamp {
    Timestamp::from_secs(1_700_000_000)
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn signer(name: &str) -> SignerId {
    SignerId::new(name)
}

// Test modules
mod creation;
mod fan_out;
mod listing;
mod scenarios;
