//! Named group predicates. A group gate stores only group names; whether a
//! concrete actor belongs to a group is decided by a predicate looked up
//! here at evaluation time. The registry is a plain value to be injected
//! wherever needed, never process-global state, so tests can scope one per
//! run.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::value::{Actor, GateInput, ValueError};

type Predicate = Box<dyn Fn(&dyn Actor) -> bool + Send + Sync>;

/// A registered group, returned by the checked lookup
/// [`GroupRegistry::group`]. Holds only the name; use it to build the
/// enable/disable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&Group> for GateInput {
    fn from(group: &Group) -> Self {
        GateInput::group(&group.name)
    }
}

/// Registry mapping group name to membership predicate.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Predicate>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under a name. Registering the same name again
    /// replaces the previous predicate.
    pub fn register<F>(&self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&dyn Actor) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(group = %name, "registering group");
        let mut groups = self.groups.write().unwrap();
        groups.insert(name, Box::new(predicate));
    }

    /// Remove one group. Returns false if it was not registered.
    pub fn unregister(&self, name: &str) -> bool {
        let mut groups = self.groups.write().unwrap();
        groups.remove(name).is_some()
    }

    /// Remove every registered group.
    pub fn unregister_all(&self) {
        let mut groups = self.groups.write().unwrap();
        groups.clear();
    }

    pub fn is_registered(&self, name: &str) -> bool {
        let groups = self.groups.read().unwrap();
        groups.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let groups = self.groups.read().unwrap();
        groups.keys().cloned().collect()
    }

    /// Checked lookup, for callers that want a typo on an unregistered
    /// group name to fail before anything is stored.
    pub fn group(&self, name: &str) -> Result<Group, ValueError> {
        if !self.is_registered(name) {
            return Err(ValueError::UnknownGroup(name.to_string()));
        }
        Ok(Group {
            name: name.to_string(),
        })
    }

    /// Whether the named group's predicate matches the actor. An
    /// unregistered group matches nobody.
    pub fn matches(&self, name: &str, actor: &dyn Actor) -> bool {
        let groups = self.groups.read().unwrap();
        match groups.get(name) {
            Some(predicate) => predicate(actor),
            None => false,
        }
    }
}
