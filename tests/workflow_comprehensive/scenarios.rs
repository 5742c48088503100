//! Named end-to-end scenarios.

use std::sync::{Arc, Barrier};
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use covenant::{
    ApplicationId, CovenantError, InvokeResponse, NewContract, SignerSet, StaticInvocation,
};

use crate::*;

#[test]
fn three_party_approval() {
    let h = Harness::new();

    // A creates with B and C, default expiry
    let record = h.call_ok("create", &["D", "0", "B", "C"], "A", 0);
    let id = covenant::ContractId::new(record["@contract"].as_str().unwrap());
    assert_eq!(record["approved_count"], 1);
    assert_eq!(record["expiry_time"], t0().add_days(15).to_rfc3339());
    assert_eq!(h.siblings(&id).len(), 3);

    let update = h.store.approve(&id, &signer("B"), t0().add_secs(60)).unwrap();
    assert_eq!(update.contract.approved_count, 2);
    assert!(update.contract.executed_time.is_none());
    assert_eq!(update.records_written, 3);

    let update = h.store.approve(&id, &signer("C"), t0().add_secs(120)).unwrap();
    assert_eq!(update.contract.approved_count, 3);
    assert_eq!(update.records_written, 3);
    for record in h.siblings(&id) {
        assert_eq!(record.executed_time, Some(t0().add_secs(120)));
    }
}

#[test]
fn creator_alone_is_rejected() {
    let h = Harness::new();
    let err = h
        .store
        .create(
            "tx-1",
            t0(),
            NewContract {
                application_id: ApplicationId::new(APP),
                document: "D".to_string(),
                signers: SignerSet::with_signers(signer("A"), [signer("A")]),
                expiry_secs: 0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, CovenantError::InvalidSignerCount { count: 1, .. }));
    assert!(h.store.database().storage().is_empty());
}

#[test]
fn execution_callback_reaches_caller_only() {
    let h = Harness::new();
    let id = h.create("A", &["B"], "0");

    let inv = StaticInvocation::new("tx-exec", t0().add_secs(5), "B")
        .with_application(APP)
        .reply(APP, InvokeResponse::ok(b"{\"settled\":true}".to_vec()));
    let response = h.executor.invoke("approve", &strings(&[id.as_str()]), &inv);
    let record: serde_json::Value = serde_json::from_slice(&response.payload).unwrap();

    let callback = STANDARD.decode(record["callback"].as_str().unwrap()).unwrap();
    assert_eq!(callback, b"{\"settled\":true}".to_vec());
    assert!(h.siblings(&id).iter().all(|r| r.callback.is_none()));
}

#[test]
fn racing_approvals_never_merge() {
    let h = Arc::new(Harness::new());
    let id = h.create("A", &["B", "C", "D"], "0");
    let barrier = Arc::new(Barrier::new(3));

    let handles: Vec<_> = ["B", "C", "D"]
        .into_iter()
        .enumerate()
        .map(|(i, who)| {
            let h = Arc::clone(&h);
            let barrier = Arc::clone(&barrier);
            let id = id.clone();
            thread::spawn(move || {
                barrier.wait();
                h.store.approve(&id, &signer(who), t0().add_secs(10 + i as u64))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|j| j.join().unwrap()).collect();
    let won = results.iter().filter(|r| r.is_ok()).count();
    assert!(won >= 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(err.is_conflict(), "unexpected error: {}", err);
    }

    // Every sibling agrees, and the count matches the approvals that landed
    let records = h.siblings(&id);
    let approvals = records.iter().filter(|r| r.sign.approved_time.is_some()).count();
    for record in &records {
        assert_eq!(record.approved_count, approvals);
        assert_eq!(record.approved_count, 1 + won);
    }
}
