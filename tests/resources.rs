// tests/resources.rs
#![cfg(feature = "system-resources")]

use std::cell::RefCell;
use std::rc::Rc;

use skill_progress::mechanics::{FixedCoin, SeededCoin};
use skill_progress::systems::resources::{
    Consumption, RESOURCE_KEY, ResourceConfig, ResourceState, ResourceStore,
};
use skill_progress::systems::sdk::MemoryBackend;

fn fixed(coin: FixedCoin) -> ResourceStore<MemoryBackend, FixedCoin> {
    ResourceStore::open(MemoryBackend::new(), coin, ResourceConfig::default()).unwrap()
}

#[test]
fn fresh_store_is_full() {
    let s = fixed(FixedCoin::tails());
    assert_eq!(s.state(), ResourceState::full(1000));
    assert_eq!(s.state().depletion(), 0.0);
}

#[test]
fn short_balance_changes_nothing() {
    let mut s = fixed(FixedCoin::heads());
    s.set_points(5, None).unwrap();
    let before_text = s.backend().raw(RESOURCE_KEY);
    let c = s.consume_points(10).unwrap();
    assert_eq!(c, Consumption { success: false, triggered: false, crossed: 0 });
    assert_eq!(s.state().current_points, 5);
    assert_eq!(s.backend().raw(RESOURCE_KEY), before_text);
    assert_eq!(s.coin().flips, 0);
}

#[test]
fn landing_exactly_on_thirty_percent_rolls_once() {
    let mut s = fixed(FixedCoin::heads());
    let c = s.consume_points(300).unwrap();
    assert!(c.success);
    assert!(c.triggered);
    assert_eq!(c.crossed, 1);
    assert_eq!(s.coin().flips, 1);
    assert!(s.state().has_pending_package);

    // sitting on the line already: a further spend does not roll 30 % again
    let c = s.consume_points(10).unwrap();
    assert_eq!(c.crossed, 0);
    assert_eq!(s.coin().flips, 1);
}

#[test]
fn small_spends_roll_each_threshold_once() {
    let mut s = fixed(FixedCoin::tails());
    for _ in 0..100 {
        assert!(s.consume_points(10).unwrap().success);
    }
    assert_eq!(s.state().current_points, 0);
    assert_eq!(s.coin().flips, 3);
    assert!(!s.state().has_pending_package);
    assert!(!s.consume_points(1).unwrap().success);
}

#[test]
fn one_big_spend_rolls_every_crossed_threshold() {
    let mut s = fixed(FixedCoin::tails());
    let c = s.consume_points(950).unwrap();
    assert_eq!(c, Consumption { success: true, triggered: false, crossed: 3 });
    assert_eq!(s.coin().flips, 3);
}

#[test]
fn tails_leaves_no_package() {
    let mut s = fixed(FixedCoin::tails());
    let c = s.consume_points(600).unwrap();
    assert_eq!(c.crossed, 2);
    assert!(!c.triggered);
    assert!(!s.state().has_pending_package);
}

#[test]
fn claim_is_one_shot() {
    let mut s = fixed(FixedCoin::heads());
    s.consume_points(310).unwrap();
    assert!(s.claim_package().unwrap());
    assert!(!s.state().has_pending_package);
    let after_claim = s.backend().raw(RESOURCE_KEY);
    assert!(!s.claim_package().unwrap());
    assert_eq!(s.backend().raw(RESOURCE_KEY), after_claim);
}

#[test]
fn claim_without_package_writes_nothing() {
    let mut s = fixed(FixedCoin::heads());
    assert!(!s.claim_package().unwrap());
    assert!(s.backend().raw(RESOURCE_KEY).is_none());
    assert_eq!(s.state(), ResourceState::full(1000));
}

#[test]
fn snapshot_survives_reopen() {
    let backend = Rc::new(MemoryBackend::new());
    let mut s = ResourceStore::open(Rc::clone(&backend), FixedCoin::heads(), ResourceConfig::default()).unwrap();
    s.consume_points(320).unwrap();

    let again = ResourceStore::open(Rc::clone(&backend), FixedCoin::tails(), ResourceConfig::default()).unwrap();
    assert_eq!(
        again.state(),
        ResourceState { total_points: 1000, current_points: 680, has_pending_package: true }
    );
    let raw = backend.raw(RESOURCE_KEY).unwrap();
    assert!(raw.contains("\"currentPoints\":680"));
    assert!(raw.contains("\"hasPendingPackage\":true"));
}

#[test]
fn malformed_snapshot_starts_full() {
    let backend = MemoryBackend::new();
    backend.put_raw(RESOURCE_KEY, "{{{{");
    let s = ResourceStore::open(backend, FixedCoin::tails(), ResourceConfig::default()).unwrap();
    assert_eq!(s.state(), ResourceState::full(1000));
}

#[test]
fn seeded_coin_respects_certain_odds() {
    let always = ResourceConfig { bonus_chance: 1.0, ..ResourceConfig::default() };
    let mut s = ResourceStore::open(MemoryBackend::new(), SeededCoin::new(9), always).unwrap();
    assert!(s.consume_points(300).unwrap().triggered);

    let never = ResourceConfig { bonus_chance: 0.0, ..ResourceConfig::default() };
    let mut s = ResourceStore::open(MemoryBackend::new(), SeededCoin::new(9), never).unwrap();
    assert!(!s.consume_points(1000).unwrap().triggered);
}

#[test]
fn observers_see_every_saved_change() {
    let seen: Rc<RefCell<Vec<ResourceState>>> = Rc::new(RefCell::new(Vec::new()));
    let mut s = fixed(FixedCoin::heads());
    let id = {
        let seen = Rc::clone(&seen);
        s.subscribe(move |st: &ResourceState| seen.borrow_mut().push(*st))
    };

    s.consume_points(100).unwrap();
    s.consume_points(5_000).unwrap(); // rejected, not saved
    s.consume_points(200).unwrap();
    s.claim_package().unwrap();
    assert_eq!(
        seen.borrow().iter().map(|st| st.current_points).collect::<Vec<_>>(),
        vec![900, 700, 700]
    );
    assert!(!seen.borrow()[2].has_pending_package);

    assert!(s.unsubscribe(id));
    s.consume_points(1).unwrap();
    assert_eq!(seen.borrow().len(), 3);
    assert!(!s.unsubscribe(id));
}

#[test]
fn custom_thresholds_and_capacity() {
    let cfg = ResourceConfig { total_points: 40, thresholds_pct: [25, 50, 75], bonus_chance: 0.5 };
    let mut s = ResourceStore::open(MemoryBackend::new(), FixedCoin::heads(), cfg).unwrap();
    assert_eq!(s.state().total_points, 40);
    assert_eq!(s.consume_points(10).unwrap().crossed, 1); // 25 %
    assert_eq!(s.consume_points(19).unwrap().crossed, 1); // 72.5 %: only 50
    assert_eq!(s.consume_points(1).unwrap().crossed, 1); // 75 %
}
