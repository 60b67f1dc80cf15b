//! Canonicalization of caller-supplied values into the strings a backend
//! stores. Whatever shape the caller starts from (an actor object, a group
//! name, an integer percentage), the same logical value always lands in
//! storage as the same string.

use core::fmt;

use thiserror::Error;

use crate::gate::GateKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("percentage out of range: {0} (expected 0..=100)")]
    OutOfRange(u8),
    #[error("group not registered: {0}")]
    UnknownGroup(String),
}

/// Anything that can act as a gate actor. The only capability the store
/// needs is a stable identifier: the same logical id must canonicalize to
/// the same string no matter what type carried it, so `22u64` and `"22"`
/// address the same stored entry.
pub trait Actor {
    fn actor_id(&self) -> String;
}

impl<T: Actor + ?Sized> Actor for &T {
    fn actor_id(&self) -> String {
        (**self).actor_id()
    }
}

impl Actor for str {
    fn actor_id(&self) -> String {
        self.to_string()
    }
}

impl Actor for String {
    fn actor_id(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_actor_for_int {
    ($($t:ty),*) => {
        $(impl Actor for $t {
            fn actor_id(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_actor_for_int!(i32, i64, u32, u64);

/// A rollout percentage, checked into `0..=100` at construction so a
/// backend never sees an out-of-range value through this API. Canonical
/// form is plain decimal with no sign or padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentage(u8);

impl Percentage {
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange(value));
        }
        Ok(Percentage(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Percentage::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An enablement payload: the raw value of an `enable`/`disable` call,
/// already coerced to canonical form and tagged with the gate kind it
/// targets. Carrying the kind inside the payload makes a kind/value
/// mismatch unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateInput {
    Boolean(bool),
    Group(String),
    Actor(String),
    PercentageOfActors(Percentage),
    PercentageOfRandom(Percentage),
}

impl GateInput {
    /// Payload for enabling the boolean gate.
    pub fn boolean() -> Self {
        GateInput::Boolean(true)
    }

    /// Payload for disabling the boolean gate. The flag itself is never
    /// inspected by adapters; disabling the boolean gate always resets the
    /// whole feature.
    pub fn boolean_off() -> Self {
        GateInput::Boolean(false)
    }

    pub fn group(name: impl Into<String>) -> Self {
        GateInput::Group(name.into())
    }

    pub fn actor<A: Actor + ?Sized>(actor: &A) -> Self {
        GateInput::Actor(actor.actor_id())
    }

    pub fn percentage_of_actors(value: u8) -> Result<Self, ValueError> {
        Ok(GateInput::PercentageOfActors(Percentage::new(value)?))
    }

    pub fn percentage_of_random(value: u8) -> Result<Self, ValueError> {
        Ok(GateInput::PercentageOfRandom(Percentage::new(value)?))
    }

    /// The gate kind this payload targets.
    pub fn kind(&self) -> GateKind {
        match self {
            GateInput::Boolean(_) => GateKind::Boolean,
            GateInput::Group(_) => GateKind::Group,
            GateInput::Actor(_) => GateKind::Actor,
            GateInput::PercentageOfActors(_) => GateKind::PercentageOfActors,
            GateInput::PercentageOfRandom(_) => GateKind::PercentageOfRandom,
        }
    }

    /// The canonical stored string. For the boolean gate this is always
    /// `"true"`: an enable payload is only checked for presence.
    pub fn canonical(&self) -> String {
        match self {
            GateInput::Boolean(_) => "true".to_string(),
            GateInput::Group(name) => name.clone(),
            GateInput::Actor(id) => id.clone(),
            GateInput::PercentageOfActors(p) => p.to_string(),
            GateInput::PercentageOfRandom(p) => p.to_string(),
        }
    }
}
