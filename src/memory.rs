//! Reference in-memory backend: a lock-guarded map of feature name to
//! gate values. Usable as a real backend (no external dependency) and as
//! the known-correct baseline the conformance battery was derived from.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, trace};

use crate::adapter::{apply_disable, apply_enable, Adapter, AdapterError};
use crate::gate::{Feature, GateValues};
use crate::value::GateInput;

/// In-memory feature storage backed by a `RwLock<HashMap>`.
///
/// Every mutation holds the write lock for the whole operation, so the
/// boolean-disable full reset is a single atomic step from any reader's
/// point of view, and concurrent inserts of disjoint set elements are
/// never lost.
#[derive(Default)]
pub struct MemoryAdapter {
    features: RwLock<HashMap<String, GateValues>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the whole feature map to JSON, e.g. to seed fixtures or
    /// hand state to another instance.
    pub fn snapshot(&self) -> Result<Vec<u8>, AdapterError> {
        let features = self.features.read().unwrap();
        Ok(serde_json::to_vec(&*features)?)
    }

    /// Replace all state with a snapshot produced by [`snapshot`](Self::snapshot).
    pub fn restore(&self, snapshot: &[u8]) -> Result<(), AdapterError> {
        let incoming: HashMap<String, GateValues> = serde_json::from_slice(snapshot)?;
        let mut features = self.features.write().unwrap();
        debug!(features = incoming.len(), "restoring memory adapter snapshot");
        *features = incoming;
        Ok(())
    }

    /// Names of all features with any stored state.
    pub fn feature_names(&self) -> Vec<String> {
        let features = self.features.read().unwrap();
        features.keys().cloned().collect()
    }
}

impl Adapter for MemoryAdapter {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, feature: &Feature) -> Result<GateValues, AdapterError> {
        let features = self.features.read().unwrap();
        trace!(feature = feature.name(), "get");
        Ok(features.get(feature.name()).cloned().unwrap_or_default())
    }

    fn enable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError> {
        let mut features = self.features.write().unwrap();
        debug!(feature = feature.name(), gate = %input.kind(), "enable");
        let values = features.entry(feature.name().to_string()).or_default();
        apply_enable(values, input);
        Ok(())
    }

    fn disable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError> {
        let mut features = self.features.write().unwrap();
        debug!(feature = feature.name(), gate = %input.kind(), "disable");
        let values = features.entry(feature.name().to_string()).or_default();
        apply_disable(values, input);
        if values.is_default() {
            features.remove(feature.name());
        }
        Ok(())
    }
}
