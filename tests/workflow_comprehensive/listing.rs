//! Listing modes partition a signer's contracts at any instant.

use std::collections::HashSet;

use proptest::prelude::*;

use covenant::{ApplicationId, ContractPage, CovenantConfig, Database, ListMode};

use crate::*;

fn ids(page: &ContractPage) -> HashSet<String> {
    page.records.iter().map(|r| r.id.as_str().to_string()).collect()
}

fn listing(h: &Harness, who: &str, mode: ListMode, offset_secs: u64) -> HashSet<String> {
    let page = h
        .store
        .list(&signer(who), &ApplicationId::new(APP), mode, None, t0().add_secs(offset_secs))
        .unwrap();
    ids(&page)
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Leave,
    Approve,
    Disapprove,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Leave), Just(Action::Approve), Just(Action::Disapprove)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn modes_partition_contracts(
        plan in prop::collection::vec((action(), action(), 600u64..1_200), 1..8),
        probe in 0u64..1_500,
    ) {
        let h = Harness::with_database(
            Database::open(CovenantConfig { page_size: 100, ..Default::default() }).unwrap(),
        );
        for (i, (bob, carol, expiry)) in plan.iter().enumerate() {
            let creator = format!("creator-{}", i);
            let id = h.create(&creator, &["bob", "carol"], &expiry.to_string());
            for (who, act) in [("bob", bob), ("carol", carol)] {
                let function = match act {
                    Action::Leave => continue,
                    Action::Approve => "approve",
                    Action::Disapprove => "disapprove",
                };
                // Rejections (already canceled) are part of the plan
                let _ = h.call(function, &[id.as_str()], who, 100);
            }
        }

        let all = listing(&h, "bob", ListMode::All, probe);
        let finished = listing(&h, "bob", ListMode::Finished, probe);
        let unfinished = listing(&h, "bob", ListMode::Unfinished, probe);
        let approved = listing(&h, "bob", ListMode::Approved, probe);
        let unsigned = listing(&h, "bob", ListMode::Unsigned, probe);

        prop_assert_eq!(all.len(), plan.len());
        prop_assert!(finished.is_disjoint(&unfinished));
        prop_assert_eq!(finished.union(&unfinished).count(), all.len());
        prop_assert!(approved.is_subset(&unfinished));
        prop_assert!(unsigned.is_subset(&unfinished));
        prop_assert!(approved.is_disjoint(&unsigned));
    }
}

#[test]
fn listing_is_scoped_to_signer_and_application() {
    let h = Harness::new();
    let id = h.create("alice", &["bob"], "0");

    assert!(listing(&h, "bob", ListMode::All, 1).contains(id.as_str()));
    assert!(listing(&h, "carol", ListMode::All, 1).is_empty());

    let other = h
        .store
        .list(&signer("bob"), &ApplicationId::new("market"), ListMode::All, None, t0())
        .unwrap();
    assert!(other.records.is_empty());
}

#[test]
fn sort_orders() {
    let h = Harness::new();
    let short = h.create("alice", &["bob"], "600");
    let long = h.create("carol", &["bob"], "7200");

    let page = h
        .store
        .list(&signer("bob"), &ApplicationId::new(APP), ListMode::Unsigned, None, t0())
        .unwrap();
    let order: Vec<_> = page.records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(order, vec![short.clone(), long.clone()], "expiry ascending");

    let page = h
        .store
        .list(&signer("bob"), &ApplicationId::new(APP), ListMode::Finished, None, t0().add_secs(8_000))
        .unwrap();
    let order: Vec<_> = page.records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(order, vec![long, short], "finished time descending");
}

#[test]
fn default_and_unknown_modes() {
    let h = Harness::new();
    let waiting = h.create("alice", &["bob"], "0");
    let done = h.create("carol", &["bob"], "0");
    h.call_ok("disapprove", &[done.as_str()], "bob", 5);

    let page = h.call_ok("list", &[APP], "bob", 10);
    assert_eq!(page["meta"]["fetched_records_count"], 1);
    assert_eq!(page["records"][0]["@contract"], waiting.as_str());

    let page = h.call_ok("list", &[APP, "everything"], "bob", 10);
    assert_eq!(page["meta"]["fetched_records_count"], 2);
}
