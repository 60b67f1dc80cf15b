use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The five gate kinds. This enumeration is closed: backends and callers
/// get compile-time exhaustiveness over it, and an unknown kind cannot be
/// expressed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Boolean,
    Group,
    Actor,
    PercentageOfActors,
    PercentageOfRandom,
}

impl GateKind {
    /// All kinds, in declaration order.
    pub const ALL: [GateKind; 5] = [
        GateKind::Boolean,
        GateKind::Group,
        GateKind::Actor,
        GateKind::PercentageOfActors,
        GateKind::PercentageOfRandom,
    ];

    pub fn cardinality(&self) -> Cardinality {
        match self {
            GateKind::Group | GateKind::Actor => Cardinality::Multi,
            GateKind::Boolean | GateKind::PercentageOfActors | GateKind::PercentageOfRandom => {
                Cardinality::Single
            }
        }
    }

    /// Canonical name, also used as the snapshot key.
    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Boolean => "boolean",
            GateKind::Group => "group",
            GateKind::Actor => "actor",
            GateKind::PercentageOfActors => "percentage_of_actors",
            GateKind::PercentageOfRandom => "percentage_of_random",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How many canonical values a gate holds at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// One nullable string (boolean, both percentages).
    Single,
    /// A set of strings (group, actor).
    Multi,
}

/// The stored value of a single gate, tagged by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateValue {
    Single(Option<String>),
    Set(HashSet<String>),
}

/// The result of [`Adapter::get`](crate::Adapter::get): one slot per gate
/// kind. Every kind is always present (the struct has a field per kind),
/// so a never-touched feature reads back as [`GateValues::default`] rather
/// than an error or a partial map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateValues {
    pub boolean: Option<String>,
    pub groups: HashSet<String>,
    pub actors: HashSet<String>,
    pub percentage_of_actors: Option<String>,
    pub percentage_of_random: Option<String>,
}

impl GateValues {
    /// The value of one gate, as a tagged variant.
    pub fn value(&self, kind: GateKind) -> GateValue {
        match kind {
            GateKind::Boolean => GateValue::Single(self.boolean.clone()),
            GateKind::Group => GateValue::Set(self.groups.clone()),
            GateKind::Actor => GateValue::Set(self.actors.clone()),
            GateKind::PercentageOfActors => GateValue::Single(self.percentage_of_actors.clone()),
            GateKind::PercentageOfRandom => GateValue::Single(self.percentage_of_random.clone()),
        }
    }

    /// True when no gate has ever been enabled (or everything was reset).
    pub fn is_default(&self) -> bool {
        *self == GateValues::default()
    }
}

/// A named togglable capability. Features exist implicitly: referencing one
/// that was never enabled is normal and reads back as the default map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    name: String,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Feature::new(name)
    }
}

impl From<String> for Feature {
    fn from(name: String) -> Self {
        Feature::new(name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<&str> = GateKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "boolean",
                "group",
                "actor",
                "percentage_of_actors",
                "percentage_of_random"
            ]
        );
    }

    #[test]
    fn test_cardinality_table() {
        assert_eq!(GateKind::Boolean.cardinality(), Cardinality::Single);
        assert_eq!(GateKind::Group.cardinality(), Cardinality::Multi);
        assert_eq!(GateKind::Actor.cardinality(), Cardinality::Multi);
        assert_eq!(GateKind::PercentageOfActors.cardinality(), Cardinality::Single);
        assert_eq!(GateKind::PercentageOfRandom.cardinality(), Cardinality::Single);
    }

    #[test]
    fn test_default_map_has_all_kinds() {
        let values = GateValues::default();
        assert!(values.is_default());
        for kind in GateKind::ALL {
            match values.value(kind) {
                GateValue::Single(v) => assert_eq!(v, None),
                GateValue::Set(s) => assert!(s.is_empty()),
            }
        }
    }

    #[test]
    fn test_value_accessor_reflects_fields() {
        let mut values = GateValues::default();
        values.boolean = Some("true".to_string());
        values.groups.insert("admins".to_string());
        assert_eq!(
            values.value(GateKind::Boolean),
            GateValue::Single(Some("true".to_string()))
        );
        assert_eq!(
            values.value(GateKind::Group),
            GateValue::Set(HashSet::from(["admins".to_string()]))
        );
        assert!(!values.is_default());
    }

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&GateKind::PercentageOfActors).unwrap(),
            "\"percentage_of_actors\""
        );
    }
}
