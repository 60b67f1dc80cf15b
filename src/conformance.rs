//! Backend-agnostic conformance battery.
//!
//! Any new backend must pass [`run`] before being trusted: it drives the
//! adapter through enable/disable sequences and asserts the exact
//! [`GateValues`] that `get` must report after each one. The adapter is
//! treated as a black box; nothing here depends on storage layout. Point
//! it at a backend from that backend's own test suite:
//!
//! ```
//! use gatestore::{conformance, MemoryAdapter};
//!
//! conformance::run(MemoryAdapter::new);
//! ```

use std::collections::HashSet;

use crate::adapter::Adapter;
use crate::gate::{Feature, GateValues};
use crate::registry::GroupRegistry;
use crate::value::{Actor, GateInput};

/// An actor carrying an opaque string id, standing in for whatever type a
/// real caller has.
struct TestActor {
    id: String,
}

impl TestActor {
    fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Actor for TestActor {
    fn actor_id(&self) -> String {
        self.id.clone()
    }
}

/// Run every check against fresh adapters built by `new_adapter`. Panics
/// with the failing check's name on the first deviation from the contract.
pub fn run<A, F>(new_adapter: F)
where
    A: Adapter,
    F: Fn() -> A,
{
    default_values(&new_adapter());
    boolean_gate(&new_adapter());
    full_reset_on_boolean_disable(&new_adapter());
    group_gate(&new_adapter());
    actor_gate(&new_adapter());
    percentage_of_actors_gate(&new_adapter());
    percentage_of_random_gate(&new_adapter());
    actor_id_canonicalization(&new_adapter());
    enable_is_idempotent(&new_adapter());
    disable_of_absent_element_is_noop(&new_adapter());
}

fn string_set<const N: usize>(items: [&str; N]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Groups the battery refers to by name, registered the way a real caller
/// would before enabling a group gate.
fn scoped_registry() -> GroupRegistry {
    let registry = GroupRegistry::new();
    registry.register("admins", |actor| actor.actor_id().starts_with("admin"));
    registry.register("early_access", |actor| actor.actor_id().starts_with("beta"));
    registry
}

fn default_values(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");
    assert_eq!(
        adapter.get(&feature).unwrap(),
        GateValues::default(),
        "default_values: a never-touched feature must read as the all-default map"
    );
}

fn boolean_gate(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");

    adapter.enable(&feature, &GateInput::boolean()).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().boolean,
        Some("true".to_string()),
        "boolean_gate: enable must store the literal string \"true\""
    );

    adapter.disable(&feature, &GateInput::boolean_off()).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().boolean,
        None,
        "boolean_gate: disable must clear the value, not store \"false\""
    );
}

fn full_reset_on_boolean_disable(adapter: &dyn Adapter) {
    let registry = scoped_registry();
    let feature = Feature::from("stats");
    let admins = registry.group("admins").unwrap();
    let actor_22 = TestActor::new("22");

    adapter.enable(&feature, &GateInput::boolean()).unwrap();
    adapter.enable(&feature, &GateInput::from(&admins)).unwrap();
    adapter.enable(&feature, &GateInput::actor(&actor_22)).unwrap();
    adapter
        .enable(&feature, &GateInput::percentage_of_actors(25).unwrap())
        .unwrap();
    adapter
        .enable(&feature, &GateInput::percentage_of_random(45).unwrap())
        .unwrap();

    adapter.disable(&feature, &GateInput::boolean_off()).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap(),
        GateValues::default(),
        "full_reset_on_boolean_disable: disabling the boolean gate must clear every gate"
    );
}

fn group_gate(adapter: &dyn Adapter) {
    let registry = scoped_registry();
    let feature = Feature::from("stats");
    let admins = registry.group("admins").unwrap();
    let early_access = registry.group("early_access").unwrap();

    adapter.enable(&feature, &GateInput::from(&admins)).unwrap();
    adapter.enable(&feature, &GateInput::from(&early_access)).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().groups,
        string_set(["admins", "early_access"]),
        "group_gate: enabling two groups must store the union"
    );

    adapter.disable(&feature, &GateInput::from(&early_access)).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().groups,
        string_set(["admins"]),
        "group_gate: disabling one group must leave the rest"
    );

    adapter.disable(&feature, &GateInput::from(&admins)).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().groups,
        HashSet::new(),
        "group_gate: disabling the last group must leave the empty set"
    );
}

fn actor_gate(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");
    let actor_22 = TestActor::new("22");
    let actor_asdf = TestActor::new("asdf");

    adapter.enable(&feature, &GateInput::actor(&actor_22)).unwrap();
    adapter.enable(&feature, &GateInput::actor(&actor_asdf)).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().actors,
        string_set(["22", "asdf"]),
        "actor_gate: enabling two actors must store both ids"
    );

    adapter.disable(&feature, &GateInput::actor(&actor_22)).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().actors,
        string_set(["asdf"]),
        "actor_gate: disabling one actor must leave the rest"
    );

    adapter.disable(&feature, &GateInput::actor(&actor_asdf)).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().actors,
        HashSet::new(),
        "actor_gate: disabling the last actor must leave the empty set"
    );
}

fn percentage_of_actors_gate(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");

    adapter
        .enable(&feature, &GateInput::percentage_of_actors(15).unwrap())
        .unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().percentage_of_actors,
        Some("15".to_string()),
        "percentage_of_actors_gate: integer 15 must read back as the string \"15\""
    );

    adapter
        .disable(&feature, &GateInput::percentage_of_actors(0).unwrap())
        .unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().percentage_of_actors,
        Some("0".to_string()),
        "percentage_of_actors_gate: disabling with 0 must read back as \"0\""
    );
}

fn percentage_of_random_gate(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");

    adapter
        .enable(&feature, &GateInput::percentage_of_random(10).unwrap())
        .unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().percentage_of_random,
        Some("10".to_string()),
        "percentage_of_random_gate: integer 10 must read back as the string \"10\""
    );

    adapter
        .disable(&feature, &GateInput::percentage_of_random(0).unwrap())
        .unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().percentage_of_random,
        Some("0".to_string()),
        "percentage_of_random_gate: disabling with 0 must read back as \"0\""
    );
}

fn actor_id_canonicalization(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");

    // same logical id carried by an integer and by a string
    adapter.enable(&feature, &GateInput::actor(&22u64)).unwrap();
    adapter.enable(&feature, &GateInput::actor(&"22")).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap().actors,
        string_set(["22"]),
        "actor_id_canonicalization: integer 22 and string \"22\" must store one entry"
    );
}

fn enable_is_idempotent(adapter: &dyn Adapter) {
    let registry = scoped_registry();
    let feature = Feature::from("stats");
    let admins = registry.group("admins").unwrap();
    let actor_22 = TestActor::new("22");

    adapter.enable(&feature, &GateInput::actor(&actor_22)).unwrap();
    adapter.enable(&feature, &GateInput::actor(&actor_22)).unwrap();
    adapter.enable(&feature, &GateInput::from(&admins)).unwrap();
    adapter.enable(&feature, &GateInput::from(&admins)).unwrap();

    let values = adapter.get(&feature).unwrap();
    assert_eq!(
        values.actors,
        string_set(["22"]),
        "enable_is_idempotent: enabling the same actor twice must store one entry"
    );
    assert_eq!(
        values.groups,
        string_set(["admins"]),
        "enable_is_idempotent: enabling the same group twice must store one entry"
    );
}

fn disable_of_absent_element_is_noop(adapter: &dyn Adapter) {
    let feature = Feature::from("stats");
    let ghost = TestActor::new("ghost");

    adapter.disable(&feature, &GateInput::actor(&ghost)).unwrap();
    adapter.disable(&feature, &GateInput::group("nobody")).unwrap();
    assert_eq!(
        adapter.get(&feature).unwrap(),
        GateValues::default(),
        "disable_of_absent_element_is_noop: removing absent elements must not error or store anything"
    );
}

#[cfg(test)]
mod tests {
    use crate::memory::MemoryAdapter;

    #[test]
    fn test_memory_adapter_conforms() {
        super::run(MemoryAdapter::new);
    }
}
