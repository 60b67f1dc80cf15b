//! Feature-gate storage contract with interchangeable backends.
//!
//! A feature is toggled through five gates (boolean, group, actor, and two
//! percentage rollouts). This crate defines the canonical representation
//! of gate state, the [`Adapter`] contract every storage backend
//! implements, a reference in-memory backend, two wrapper backends, and
//! the [`conformance`] battery that pins the observable behavior down so
//! new backends can be trusted without re-deriving the semantics.
//!
//! # Example
//!
//! ```
//! use gatestore::{Adapter, Feature, GateInput, MemoryAdapter};
//!
//! let adapter = MemoryAdapter::new();
//! let feature = Feature::from("search");
//!
//! adapter.enable(&feature, &GateInput::group("admins"))?;
//! adapter.enable(&feature, &GateInput::percentage_of_actors(25)?)?;
//!
//! let values = adapter.get(&feature)?;
//! assert!(values.groups.contains("admins"));
//! assert_eq!(values.percentage_of_actors.as_deref(), Some("25"));
//!
//! // Disabling the boolean gate wipes all partial configuration.
//! adapter.disable(&feature, &GateInput::boolean_off())?;
//! assert!(adapter.get(&feature)?.is_default());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod conformance;
pub mod gate;
pub mod logger;
pub mod memoize;
pub mod memory;
pub mod registry;
pub mod value;

pub use adapter::{Adapter, AdapterError};
pub use gate::{Cardinality, Feature, GateKind, GateValue, GateValues};
pub use logger::{Operation, OperationKind, OperationLogger};
pub use memoize::Memoized;
pub use memory::MemoryAdapter;
pub use registry::{Group, GroupRegistry};
pub use value::{Actor, GateInput, Percentage, ValueError};
