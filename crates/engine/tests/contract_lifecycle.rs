//! Contract lifecycle tests against a full Database
//!
//! 1. **Concurrent signing** - approvals racing on one contract never both win
//! 2. **Sibling agreement** - every record of a contract shares its fields
//! 3. **Listing partitions** - modes split a signer's contracts consistently

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;

use covenant_core::{ApplicationId, Contract, ContractId, SignerId, SignerSet, Timestamp};
use covenant_engine::{ContractStore, ContractStoreExt, Database, ListMode, NewContract};

const SIGNERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn t0() -> Timestamp {
    Timestamp::from_secs(1_700_000_000)
}

fn new_contract(creator: &str, others: &[&str], expiry_secs: i64) -> NewContract {
    NewContract {
        application_id: ApplicationId::new("escrow"),
        document: r#"{"amount":10}"#.to_string(),
        signers: SignerSet::with_signers(
            SignerId::new(creator),
            others.iter().map(|s| SignerId::new(*s)),
        ),
        expiry_secs,
    }
}

/// Siblings equal each other once their signs are blanked out
fn assert_siblings_agree(store: &ContractStore, id: &ContractId) -> Vec<Contract> {
    let siblings = store.siblings(id).unwrap();
    let first = &siblings[0];
    assert_eq!(siblings.len(), first.signers_count);
    let distinct: HashSet<_> = siblings.iter().map(|c| c.sign.signer.clone()).collect();
    assert_eq!(distinct.len(), siblings.len());
    for sibling in &siblings {
        assert_eq!(sibling.with_sign(first.sign.clone()), *first);
    }
    siblings
}

// ============================================================================
// Concurrent signing
// ============================================================================

#[test]
fn test_racing_approvals_one_wins() {
    let db = Database::ephemeral();
    let store = ContractStore::new(Arc::clone(&db));
    let created = store
        .create("tx-1", t0(), new_contract("alice", &["bob", "carol", "dave"], 0))
        .unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let wins = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = ["bob", "carol"]
        .into_iter()
        .map(|name| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            let wins = Arc::clone(&wins);
            let id = created.id.clone();
            thread::spawn(move || {
                let result = db.transaction(|txn| {
                    let update = txn.contract_approve(&id, &SignerId::new(name), t0())?;
                    barrier.wait();
                    Ok(update)
                });
                match result {
                    Ok(_) => {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => assert!(e.is_conflict(), "loser must see a conflict: {}", e),
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    let siblings = assert_siblings_agree(&store, &created.id);
    assert_eq!(siblings[0].approved_count, 2);
    let approvals = siblings.iter().filter(|c| c.sign.approved_time.is_some()).count();
    assert_eq!(approvals, 2, "creator plus exactly one racer");
}

#[test]
fn test_sequential_approvals_reach_quorum_everywhere() {
    let store = ContractStore::new(Database::ephemeral());
    let created = store
        .create("tx-1", t0(), new_contract("alice", &["bob", "carol", "dave"], 0))
        .unwrap();

    for (i, name) in ["bob", "carol", "dave"].iter().enumerate() {
        let now = t0().add_secs(i as u64 + 1);
        let update = store.approve(&created.id, &SignerId::new(*name), now).unwrap();
        assert_eq!(update.records_written, 4);
        assert_eq!(update.contract.approved_count, i + 2);
    }

    let siblings = assert_siblings_agree(&store, &created.id);
    let executed = siblings[0].executed_time;
    assert!(executed.is_some());
    assert!(siblings
        .iter()
        .all(|c| c.executed_time == executed && c.finished_time == executed));
}

// ============================================================================
// Property tests
// ============================================================================

#[derive(Debug, Clone)]
enum Action {
    Approve(usize, usize),
    Disapprove(usize, usize),
    Cancel(usize, usize),
}

fn action_strategy(contracts: usize) -> impl Strategy<Value = Action> {
    let pick = (0..contracts, 0..SIGNERS.len());
    prop_oneof![
        3 => pick.clone().prop_map(|(c, s)| Action::Approve(c, s)),
        1 => pick.clone().prop_map(|(c, s)| Action::Disapprove(c, s)),
        1 => pick.prop_map(|(c, s)| Action::Cancel(c, s)),
    ]
}

fn listed(store: &ContractStore, signer: &SignerId, mode: ListMode, now: Timestamp) -> HashSet<ContractId> {
    let app = ApplicationId::new("escrow");
    let mut ids = HashSet::new();
    let mut bookmark: Option<String> = None;
    loop {
        let page = store.list(signer, &app, mode, bookmark.as_deref(), now).unwrap();
        if page.records.is_empty() {
            break;
        }
        ids.extend(page.records.into_iter().map(|c| c.id));
        bookmark = Some(page.meta.bookmark);
    }
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever happens, siblings agree and listings partition correctly
    #[test]
    fn prop_fan_out_and_listing_partitions(
        expiries in proptest::collection::vec(prop_oneof![Just(0i64), 600i64..3_600], 1..5),
        actions in proptest::collection::vec(action_strategy(5), 0..20),
        probe_offset in 0u64..4_000,
    ) {
        let store = ContractStore::new(Database::ephemeral());
        let mut ids = Vec::new();
        for (i, expiry) in expiries.iter().enumerate() {
            let creator = SIGNERS[i % SIGNERS.len()];
            let others: Vec<&str> = SIGNERS.iter().copied().filter(|s| *s != creator).collect();
            let created = store
                .create(&format!("tx-{}", i), t0(), new_contract(creator, &others, *expiry))
                .unwrap();
            ids.push(created.id);
        }

        for (step, action) in actions.iter().enumerate() {
            let now = t0().add_secs(step as u64 * 60);
            let (c, s) = match action {
                Action::Approve(c, s) | Action::Disapprove(c, s) | Action::Cancel(c, s) => (*c, *s),
            };
            let Some(id) = ids.get(c) else { continue };
            let signer = SignerId::new(SIGNERS[s]);
            let _ = match action {
                Action::Approve(..) => store.approve(id, &signer, now),
                Action::Disapprove(..) => store.disapprove(id, &signer, now),
                Action::Cancel(..) => store.cancel(id, &signer, now),
            };
        }

        for id in &ids {
            let siblings = assert_siblings_agree(&store, id);
            let first = &siblings[0];
            prop_assert!(!(first.executed_time.is_some() && first.canceled_time.is_some()));
            let approvals = siblings.iter().filter(|c| c.sign.approved_time.is_some()).count();
            prop_assert_eq!(approvals, first.approved_count);
        }

        let now = t0().add_secs(probe_offset);
        for name in SIGNERS {
            let signer = SignerId::new(name);
            let all = listed(&store, &signer, ListMode::All, now);
            let finished = listed(&store, &signer, ListMode::Finished, now);
            let unfinished = listed(&store, &signer, ListMode::Unfinished, now);
            let approved = listed(&store, &signer, ListMode::Approved, now);
            let unsigned = listed(&store, &signer, ListMode::Unsigned, now);

            prop_assert!(finished.is_disjoint(&unfinished));
            let union: HashSet<_> = finished.union(&unfinished).cloned().collect();
            prop_assert_eq!(union, all.clone());
            prop_assert!(approved.is_subset(&unfinished));
            prop_assert!(unsigned.is_subset(&unfinished));
            prop_assert!(approved.is_disjoint(&unsigned));
        }
    }
}
