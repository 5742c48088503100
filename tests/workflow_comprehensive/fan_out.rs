//! Fan-out: every change reaches every sibling, private signs stay private.

use crate::*;

#[test]
fn quorum_executes_every_sibling_at_once() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "carol", "dave"], "0");

    h.call_ok("approve", &[id.as_str()], "bob", 10);
    h.call_ok("approve", &[id.as_str()], "carol", 20);
    for record in h.siblings(&id) {
        assert!(record.executed_time.is_none());
        assert_eq!(record.approved_count, 3);
    }

    h.call_ok("approve", &[id.as_str()], "dave", 30);
    let executed = Some(t0().add_secs(30));
    for record in h.siblings(&id) {
        assert_eq!(record.executed_time, executed);
        assert_eq!(record.finished_time, executed);
        assert_eq!(record.updated_time, executed);
        assert_eq!(record.approved_count, 4);
        assert!(record.sign.approved_time.is_some());
        assert!(record.callback.is_none());
    }
}

#[test]
fn signs_are_kept_per_signer() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "carol"], "0");
    h.call_ok("approve", &[id.as_str()], "bob", 10);

    let carol = h.store.get(&id, &signer("carol")).unwrap();
    assert!(carol.sign.approved_time.is_none(), "bob's approval is not copied to carol");
    assert_eq!(carol.approved_count, 2);

    let bob = h.store.get(&id, &signer("bob")).unwrap();
    assert_eq!(bob.sign.approved_time, Some(t0().add_secs(10)));
}

#[test]
fn disapproval_cancels_regardless_of_approvals() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "carol", "dave"], "0");
    h.call_ok("approve", &[id.as_str()], "bob", 10);
    h.call_ok("approve", &[id.as_str()], "carol", 20);

    h.call_ok("disapprove", &[id.as_str()], "dave", 30);
    let canceled = Some(t0().add_secs(30));
    for record in h.siblings(&id) {
        assert_eq!(record.canceled_time, canceled);
        assert_eq!(record.finished_time, canceled);
        assert!(record.executed_time.is_none());
        assert_eq!(
            record.sign.disapproved_time.is_some(),
            record.sign.signer == signer("dave")
        );
    }
}

#[test]
fn rejected_operations_leave_records_unchanged() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "carol"], "0");
    h.call_ok("approve", &[id.as_str()], "bob", 10);
    let before = h.siblings(&id);

    let response = h.call("approve", &[id.as_str()], "bob", 20);
    assert_eq!(response.message, "failed to approve the contract|already approved");
    let response = h.call("approve", &[id.as_str()], "alice", 20);
    assert_eq!(response.message, "failed to approve the contract|already approved");
    assert_eq!(h.siblings(&id), before);

    h.call_ok("disapprove", &[id.as_str()], "carol", 30);
    let before = h.siblings(&id);
    let response = h.call("disapprove", &[id.as_str()], "carol", 40);
    assert_eq!(response.message, "failed to disapprove the contract|already canceled");
    let response = h.call("approve", &[id.as_str()], "carol", 40);
    assert_eq!(response.message, "failed to approve the contract|already canceled");
    assert_eq!(h.siblings(&id), before);
}

#[test]
fn expired_contract_rejects_signing_but_stays_readable() {
    let h = Harness::new();
    let id = h.create("alice", &["bob", "carol"], "600");

    for function in ["approve", "disapprove"] {
        let response = h.call(function, &[id.as_str()], "bob", 600);
        assert!(response.message.ends_with("|already expired"), "{}", response.message);
    }
    let record = h.call_ok("get", &[id.as_str()], "carol", 700);
    assert_eq!(record["approved_count"], 1);

    let page = h.call_ok("list", &[APP, "finished"], "carol", 700);
    assert_eq!(page["meta"]["fetched_records_count"], 1);
}
