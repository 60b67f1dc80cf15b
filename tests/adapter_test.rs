use std::collections::HashSet;
use std::thread;

use gatestore::{
    conformance, Adapter, Feature, GateInput, GateValues, Memoized, MemoryAdapter, OperationLogger,
};

#[test]
fn test_memory_adapter_conformance() {
    conformance::run(MemoryAdapter::new);
}

#[test]
fn test_operation_logger_conformance() {
    conformance::run(|| OperationLogger::new(MemoryAdapter::new()));
}

#[test]
fn test_memoized_conformance() {
    conformance::run(|| Memoized::new(MemoryAdapter::new()));
}

#[test]
fn test_memoized_logger_stack_conformance() {
    // wrappers compose; the stacked adapter still satisfies the contract
    conformance::run(|| Memoized::new(OperationLogger::new(MemoryAdapter::new())));
}

fn string_set<const N: usize>(items: [&str; N]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_mixed_actor_id_scenario() {
    let adapter = MemoryAdapter::new();
    let feature = Feature::from("stats");

    adapter.enable(&feature, &GateInput::actor(&22u64)).unwrap();
    adapter.enable(&feature, &GateInput::actor(&"asdf")).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().actors,
        string_set(["22", "asdf"])
    );

    adapter.disable(&feature, &GateInput::actor(&22u64)).unwrap();
    assert_eq!(adapter.get(&feature).unwrap().actors, string_set(["asdf"]));

    adapter.disable(&feature, &GateInput::actor(&"asdf")).unwrap();
    assert_eq!(adapter.get(&feature).unwrap().actors, HashSet::new());
}

#[test]
fn test_features_do_not_interfere() {
    let adapter = MemoryAdapter::new();
    let search = Feature::from("search");
    let stats = Feature::from("stats");

    adapter.enable(&search, &GateInput::boolean()).unwrap();
    adapter.enable(&stats, &GateInput::group("admins")).unwrap();

    adapter.disable(&search, &GateInput::boolean_off()).unwrap();
    assert!(adapter.get(&search).unwrap().is_default());
    assert_eq!(adapter.get(&stats).unwrap().groups, string_set(["admins"]));
}

#[test]
fn test_concurrent_disjoint_actor_enables_are_not_lost() {
    let adapter = MemoryAdapter::new();
    let feature = Feature::from("stats");

    thread::scope(|s| {
        for i in 0..8u64 {
            let adapter = &adapter;
            let feature = &feature;
            s.spawn(move || {
                adapter.enable(feature, &GateInput::actor(&i)).unwrap();
            });
        }
    });

    let actors = adapter.get(&feature).unwrap().actors;
    assert_eq!(actors.len(), 8);
    for i in 0..8u64 {
        assert!(actors.contains(&i.to_string()), "lost actor {}", i);
    }
}

#[test]
fn test_readers_never_observe_partial_reset() {
    let adapter = MemoryAdapter::new();
    let feature = Feature::from("stats");

    // Only two states ever exist: fully populated, or fully reset. A read
    // showing anything in between means the reset was not atomic.
    let mut populated = GateValues::default();
    populated.boolean = Some("true".to_string());
    populated.actors = string_set(["22", "asdf"]);
    populated.groups = string_set(["admins"]);
    populated.percentage_of_actors = Some("25".to_string());
    populated.percentage_of_random = Some("45".to_string());

    for _ in 0..50 {
        adapter.enable(&feature, &GateInput::boolean()).unwrap();
        adapter.enable(&feature, &GateInput::actor(&22u64)).unwrap();
        adapter.enable(&feature, &GateInput::actor(&"asdf")).unwrap();
        adapter.enable(&feature, &GateInput::group("admins")).unwrap();
        adapter
            .enable(&feature, &GateInput::percentage_of_actors(25).unwrap())
            .unwrap();
        adapter
            .enable(&feature, &GateInput::percentage_of_random(45).unwrap())
            .unwrap();

        thread::scope(|s| {
            let reader = s.spawn(|| {
                for _ in 0..20 {
                    let values = adapter.get(&feature).unwrap();
                    assert!(
                        values == populated || values.is_default(),
                        "observed partially reset state: {:?}",
                        values
                    );
                }
            });
            s.spawn(|| {
                adapter.disable(&feature, &GateInput::boolean_off()).unwrap();
            });
            reader.join().unwrap();
        });

        assert!(adapter.get(&feature).unwrap().is_default());
    }
}

#[test]
fn test_snapshot_restores_into_fresh_adapter() {
    let source = MemoryAdapter::new();
    let search = Feature::from("search");
    let stats = Feature::from("stats");
    source.enable(&search, &GateInput::boolean()).unwrap();
    source.enable(&stats, &GateInput::actor(&"asdf")).unwrap();
    source
        .enable(&stats, &GateInput::percentage_of_actors(25).unwrap())
        .unwrap();

    let snapshot = source.snapshot().unwrap();
    let target = MemoryAdapter::new();
    target.enable(&Feature::from("stale"), &GateInput::boolean()).unwrap();
    target.restore(&snapshot).unwrap();

    assert_eq!(target.get(&search).unwrap(), source.get(&search).unwrap());
    assert_eq!(target.get(&stats).unwrap(), source.get(&stats).unwrap());
    // restore replaces, it does not merge
    assert!(target.get(&Feature::from("stale")).unwrap().is_default());
}
