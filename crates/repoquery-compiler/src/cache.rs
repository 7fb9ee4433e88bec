//! Per-signature plan cache.
//!
//! Each signature gets one `OnceLock` cell, handed out under a short-lived
//! map lock. Compilation itself runs outside the map lock, so different
//! signatures compile concurrently while racing callers of the same
//! signature wait on its cell. Failures are cached as well: compiling the
//! same signature again would fail the same way.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use repoquery_core::EntityModel;

use crate::compile::{CompileError, Compiler};
use crate::plan::QueryPlan;
use crate::signature::MethodSignature;

type Slot = Arc<OnceLock<Result<Arc<QueryPlan>, CompileError>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct PlanCache {
    slots: Mutex<HashMap<MethodSignature, Slot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached plan for `signature`, compiling it on first use.
    ///
    /// `compiler` must be the same (same model, grammar and config) for every
    /// call on one cache.
    pub fn get_or_compile<M: EntityModel + ?Sized>(
        &self,
        compiler: &Compiler<'_, M>,
        signature: &MethodSignature,
    ) -> Result<Arc<QueryPlan>, CompileError> {
        let slot = self.slot(signature);
        let mut compiled = false;
        let result = slot.get_or_init(|| {
            compiled = true;
            compiler.compile(signature).map(Arc::new)
        });

        if compiled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(method = %signature.name, "plan cache miss");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(method = %signature.name, "plan cache hit");
        }
        result.clone()
    }

    /// Cached result without compiling.
    pub fn get(&self, signature: &MethodSignature) -> Option<Result<Arc<QueryPlan>, CompileError>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(signature)?.get().cloned()
    }

    pub fn stats(&self) -> CacheStats {
        let size = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size,
        }
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn slot(&self, signature: &MethodSignature) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(signature) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        slots.insert(signature.clone(), Arc::clone(&slot));
        slot
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
