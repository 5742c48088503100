//! Shared fixtures for executor tests.

use serde_json::Value as JsonValue;

use covenant_core::Timestamp;
use covenant_engine::Database;

use crate::{Executor, Response, StaticInvocation};

pub const APP: &str = "escrow";

pub fn t0() -> Timestamp {
    Timestamp::from_secs(1_700_000_000)
}

pub fn executor() -> Executor {
    Executor::new(Database::ephemeral())
}

/// Authenticated `caller` calling from `APP`, `offset_secs` after `t0`
pub fn inv(tx_id: &str, offset_secs: u64, caller: &str) -> StaticInvocation {
    StaticInvocation::new(tx_id, t0().add_secs(offset_secs), caller).with_application(APP)
}

pub fn params(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn json(response: &Response) -> JsonValue {
    assert!(response.is_ok(), "unexpected failure: {}", response.message);
    serde_json::from_slice(&response.payload).unwrap()
}

/// Create a contract as `creator` with `others` at `t0`; returns its id
pub fn create(executor: &Executor, tx_id: &str, creator: &str, others: &[&str]) -> String {
    let mut args = vec!["D", "0"];
    args.extend_from_slice(others);
    let response = executor.invoke("create", &params(&args), &inv(tx_id, 0, creator));
    json(&response)["@contract"].as_str().unwrap().to_string()
}
