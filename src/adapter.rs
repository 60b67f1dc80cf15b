//! The storage contract every backend implements.
//!
//! A backend is anything that can persist, per feature, one slot per gate
//! kind: a nullable string for single-valued kinds, a string set for
//! multi-valued ones. The physical layout is the backend's business; the
//! observable behavior of `get`/`enable`/`disable` is not. The behavior is
//! pinned down by [`conformance::run`](crate::conformance::run), which any
//! new backend should be driven through before being trusted.
//!
//! The one coupled transition: disabling the boolean gate resets every
//! gate on the feature, atomically as far as readers are concerned. A
//! fully disabled feature keeps no stale group/actor/percentage state that
//! could silently resurface later.

use thiserror::Error;

use crate::gate::{Feature, GateValues};
use crate::value::GateInput;

/// Errors a backend can surface. The contract layer itself never fails:
/// unknown gate kinds are unrepresentable and "feature never touched" is a
/// normal default read. What remains is the backend's own I/O.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Backend failure (I/O, connectivity), propagated unchanged.
    #[error("backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Snapshot encode/decode failure.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Storage backend contract. Implementations must be thread-safe; `get`
/// is a pure read and must be callable concurrently, and mutations of
/// disjoint set elements must not lose updates.
pub trait Adapter: Send + Sync {
    /// Backend name, for log output.
    fn name(&self) -> &str;

    /// Current values of all five gates. Never fails for an unknown
    /// feature; that reads as [`GateValues::default`].
    fn get(&self, feature: &Feature) -> Result<GateValues, AdapterError>;

    /// Idempotently store the payload's canonical value: overwrite for
    /// single-valued kinds, set-insert for multi-valued ones.
    fn enable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError>;

    /// Idempotently remove the payload's canonical value. Boolean: reset
    /// the whole feature. Group/actor: remove the element (absent element
    /// is a no-op). Percentages: overwrite with the payload value, which
    /// callers pass as 0 to switch the rollout off.
    fn disable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError>;
}

/// The enable rules from the contract, applied to a materialized value map.
/// Backends that read-modify-write a whole `GateValues` can delegate here
/// instead of re-deriving the semantics.
pub fn apply_enable(values: &mut GateValues, input: &GateInput) {
    match input {
        GateInput::Boolean(_) => values.boolean = Some(input.canonical()),
        GateInput::Group(name) => {
            values.groups.insert(name.clone());
        }
        GateInput::Actor(id) => {
            values.actors.insert(id.clone());
        }
        GateInput::PercentageOfActors(_) => values.percentage_of_actors = Some(input.canonical()),
        GateInput::PercentageOfRandom(_) => values.percentage_of_random = Some(input.canonical()),
    }
}

/// The disable rules from the contract. Disabling the boolean gate clears
/// the entire map in one step.
pub fn apply_disable(values: &mut GateValues, input: &GateInput) {
    match input {
        GateInput::Boolean(_) => *values = GateValues::default(),
        GateInput::Group(name) => {
            values.groups.remove(name);
        }
        GateInput::Actor(id) => {
            values.actors.remove(id);
        }
        GateInput::PercentageOfActors(_) => values.percentage_of_actors = Some(input.canonical()),
        GateInput::PercentageOfRandom(_) => values.percentage_of_random = Some(input.canonical()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_enable_rules() {
        let mut values = GateValues::default();
        apply_enable(&mut values, &GateInput::boolean());
        apply_enable(&mut values, &GateInput::group("admins"));
        apply_enable(&mut values, &GateInput::group("admins"));
        apply_enable(&mut values, &GateInput::actor(&"22"));
        apply_enable(&mut values, &GateInput::percentage_of_actors(25).unwrap());

        assert_eq!(values.boolean, Some("true".to_string()));
        assert_eq!(values.groups, HashSet::from(["admins".to_string()]));
        assert_eq!(values.actors, HashSet::from(["22".to_string()]));
        assert_eq!(values.percentage_of_actors, Some("25".to_string()));
        assert_eq!(values.percentage_of_random, None);
    }

    #[test]
    fn test_boolean_disable_resets_everything() {
        let mut values = GateValues::default();
        apply_enable(&mut values, &GateInput::boolean());
        apply_enable(&mut values, &GateInput::group("admins"));
        apply_enable(&mut values, &GateInput::actor(&22u64));
        apply_enable(&mut values, &GateInput::percentage_of_random(45).unwrap());

        apply_disable(&mut values, &GateInput::boolean_off());
        assert!(values.is_default());
    }

    #[test]
    fn test_disable_absent_element_is_noop() {
        let mut values = GateValues::default();
        apply_disable(&mut values, &GateInput::group("nobody"));
        apply_disable(&mut values, &GateInput::actor(&"ghost"));
        assert_eq!(values.groups, HashSet::new());
        assert_eq!(values.actors, HashSet::new());
    }

    #[test]
    fn test_percentage_disable_overwrites() {
        let mut values = GateValues::default();
        apply_enable(&mut values, &GateInput::percentage_of_actors(15).unwrap());
        apply_disable(&mut values, &GateInput::percentage_of_actors(0).unwrap());
        assert_eq!(values.percentage_of_actors, Some("0".to_string()));
    }
}
