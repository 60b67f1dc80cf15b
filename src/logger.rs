//! Wrapper backend that records every contract call before delegating.
//! Useful in tests ("how many reads did this code path issue?") and when
//! auditing what an integration actually does to flag state.

use std::sync::Mutex;

use crate::adapter::{Adapter, AdapterError};
use crate::gate::{Feature, GateKind, GateValues};
use crate::value::GateInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Get,
    Enable,
    Disable,
}

/// One recorded contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub feature: String,
    /// Target gate for enable/disable; `get` touches all gates.
    pub gate: Option<GateKind>,
}

/// An [`Adapter`] that logs operations and forwards them to the wrapped
/// backend. Passes the full conformance battery for any conformant inner
/// adapter.
pub struct OperationLogger<A> {
    inner: A,
    name: String,
    operations: Mutex<Vec<Operation>>,
}

impl<A: Adapter> OperationLogger<A> {
    pub fn new(inner: A) -> Self {
        let name = format!("operation_logger({})", inner.name());
        Self {
            inner,
            name,
            operations: Mutex::new(Vec::new()),
        }
    }

    /// Everything recorded so far, oldest first.
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.lock().unwrap().clone()
    }

    pub fn count(&self, kind: OperationKind) -> usize {
        let operations = self.operations.lock().unwrap();
        operations.iter().filter(|op| op.kind == kind).count()
    }

    pub fn last(&self) -> Option<Operation> {
        let operations = self.operations.lock().unwrap();
        operations.last().cloned()
    }

    /// Clear the log without touching the wrapped backend.
    pub fn reset(&self) {
        self.operations.lock().unwrap().clear();
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    fn record(&self, kind: OperationKind, feature: &Feature, gate: Option<GateKind>) {
        let mut operations = self.operations.lock().unwrap();
        operations.push(Operation {
            kind,
            feature: feature.name().to_string(),
            gate,
        });
    }
}

impl<A: Adapter> Adapter for OperationLogger<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, feature: &Feature) -> Result<GateValues, AdapterError> {
        self.record(OperationKind::Get, feature, None);
        self.inner.get(feature)
    }

    fn enable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError> {
        self.record(OperationKind::Enable, feature, Some(input.kind()));
        self.inner.enable(feature, input)
    }

    fn disable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError> {
        self.record(OperationKind::Disable, feature, Some(input.kind()));
        self.inner.disable(feature, input)
    }
}
