//! Contract creation: per-signer records, expiry policy, signer limits.

use std::collections::HashSet;

use proptest::prelude::*;

use covenant::{contract_id, record_key};
use covenant_core::Storage;

use crate::*;

#[test]
fn creates_one_record_per_signer() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "carol", "dave"], "0");
    let records = h.siblings(&id);

    assert_eq!(records.len(), 4);
    let signers: HashSet<_> = records.iter().map(|r| r.sign.signer.clone()).collect();
    assert_eq!(signers.len(), 4);
    for record in &records {
        assert_eq!(record.signers_count, 4);
        assert_eq!(record.approved_count, 1);
        assert_eq!(record.creator, signer("alice"));
        assert_eq!(record.sign.approved_time.is_some(), record.sign.signer == signer("alice"));
        assert!(record.sign.disapproved_time.is_none());
        assert!(h.store.database().storage().get(&record_key(&id, &record.sign.signer)).unwrap().is_some());
    }
}

#[test]
fn id_is_derived_from_creator_and_transaction() {
    let h = Harness::new();
    let id = h.create("alice", &["bob"], "0");
    assert_eq!(id, contract_id(&signer("alice"), "create-alice-0"));
    assert_eq!(id.as_str().len(), 64);
}

#[test]
fn repeated_transaction_id_collides() {
    let h = Harness::new();
    h.create("alice", &["bob"], "0");
    let response = h.call("create", &["D", "0", "carol"], "alice", 0);
    assert!(!response.is_ok());
    assert_eq!(response.message, "failed to create a contract", "internal detail is not exposed");
}

#[test]
fn duplicate_signers_collapse() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "bob", "alice"], "0");
    assert_eq!(h.siblings(&id).len(), 2);
}

#[test]
fn expiry_policy() {
    let h = Harness::new();
    let cases = [
        ("0", t0().add_days(15)),
        ("599", t0().add_days(15)),
        ("-5", t0().add_days(15)),
        ("soon", t0().add_days(15)),
        ("600", t0().add_secs(600)),
        ("86400", t0().add_secs(86_400)),
    ];
    for (i, (expiry, expected)) in cases.iter().enumerate() {
        let creator = format!("creator-{}", i);
        let id = h.create(&creator, &["bob"], expiry);
        let record = h.store.get(&id, &signer("bob")).unwrap();
        assert_eq!(record.expiry_time, Some(*expected), "expiry {}", expiry);
        assert_eq!(record.finished_time, record.expiry_time);
    }
}

#[test]
fn signer_count_limits() {
    let h = Harness::new();
    let others: Vec<String> = (0..127).map(|i| format!("s{}", i)).collect();
    let refs: Vec<&str> = others.iter().map(String::as_str).collect();
    let id = h.create("alice", &refs, "0");
    assert_eq!(h.siblings(&id).len(), 128);

    let others: Vec<String> = (0..128).map(|i| format!("s{}", i)).collect();
    let mut args = vec!["D", "0"];
    args.extend(others.iter().map(String::as_str));
    let response = h.call("create", &args, "bob", 1);
    assert!(response.message.starts_with("failed to create a contract|invalid signer count: 129"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_valid_signer_set_yields_k_records(k in 2usize..=40) {
        let h = Harness::new();
        let others: Vec<String> = (1..k).map(|i| format!("s{}", i)).collect();
        let refs: Vec<&str> = others.iter().map(String::as_str).collect();
        let id = h.create("alice", &refs, "0");

        let records = h.siblings(&id);
        prop_assert_eq!(records.len(), k);
        let approved = records.iter().filter(|r| r.sign.approved_time.is_some()).count();
        prop_assert_eq!(approved, 1);
        prop_assert!(records.iter().all(|r| r.signers_count == k && r.approved_count == 1));
    }
}
