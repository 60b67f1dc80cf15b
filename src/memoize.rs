//! Wrapper backend that caches `get` results per feature, for callers that
//! read the same feature many times within one unit of work (a request, a
//! job) against a slow backend. Any write through this wrapper evicts the
//! written feature's cache entry, so reads after writes stay fresh.
//!
//! The cache has no expiry; hold a memoizing wrapper for a bounded unit of
//! work, not for the process lifetime, if the underlying backend is shared
//! with other writers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::trace;

use crate::adapter::{Adapter, AdapterError};
use crate::gate::{Feature, GateValues};
use crate::value::GateInput;

/// An [`Adapter`] that memoizes `get` results per feature and forwards
/// everything to the wrapped backend. Writes through the wrapper evict the
/// feature's cache entry; reads issued after a write always see it.
pub struct Memoized<A> {
    inner: A,
    name: String,
    memoizing: AtomicBool,
    cache: RwLock<HashMap<String, GateValues>>,
}

impl<A: Adapter> Memoized<A> {
    pub fn new(inner: A) -> Self {
        let name = format!("memoized({})", inner.name());
        Self {
            inner,
            name,
            memoizing: AtomicBool::new(true),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn memoizing(&self) -> bool {
        self.memoizing.load(Ordering::Relaxed)
    }

    /// Toggle memoization. Turning it off clears the cache, so turning it
    /// back on starts cold.
    pub fn set_memoize(&self, memoize: bool) {
        self.memoizing.store(memoize, Ordering::Relaxed);
        if !memoize {
            self.cache.write().unwrap().clear();
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    fn evict(&self, feature: &Feature) {
        let mut cache = self.cache.write().unwrap();
        cache.remove(feature.name());
    }
}

impl<A: Adapter> Adapter for Memoized<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, feature: &Feature) -> Result<GateValues, AdapterError> {
        if !self.memoizing() {
            return self.inner.get(feature);
        }
        // The write lock is held across the miss fill. An eviction ordered
        // after this fill takes the same lock and removes the entry, so a
        // fill that raced a write can never pin a pre-write snapshot in
        // the cache.
        let mut cache = self.cache.write().unwrap();
        if let Some(values) = cache.get(feature.name()) {
            trace!(feature = feature.name(), "memoized get hit");
            return Ok(values.clone());
        }
        let values = self.inner.get(feature)?;
        cache.insert(feature.name().to_string(), values.clone());
        Ok(values)
    }

    fn enable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError> {
        // Evict only once the write has landed in the backend; evicting
        // first would let a concurrent miss cache the pre-write value with
        // no eviction left to remove it.
        let result = self.inner.enable(feature, input);
        self.evict(feature);
        result
    }

    fn disable(&self, feature: &Feature, input: &GateInput) -> Result<(), AdapterError> {
        let result = self.inner.disable(feature, input);
        self.evict(feature);
        result
    }
}
