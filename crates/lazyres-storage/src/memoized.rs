use crate::error::RecursionDetected;
use crate::lazy_value::LazyValue;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::hash::Hash;
use std::sync::Arc;

/// A function from keys to lazily computed values, one [`LazyValue`] per key.
///
/// The map lock is held only to find or create a key's cell; the computation
/// runs under that cell's own exclusion, so two different keys never wait on
/// each other.
pub struct MemoizedFunction<K, V> {
    cells: DashMap<K, Arc<LazyValue<V>>, FxBuildHasher>,
}

impl<K, V> MemoizedFunction<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            cells: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Return the value for `key`, computing it at most once.
    pub fn get_or_try_compute<E, F>(&self, key: &K, compute: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
        E: From<RecursionDetected>,
    {
        let cell = self.cell(key);
        cell.get_or_try_init(|| compute(key))
    }

    /// The published value for `key`, if any. Never computes.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.cells.get(key).and_then(|cell| cell.get())
    }

    /// All published values, in no particular order.
    pub fn computed_values(&self) -> Vec<(K, V)> {
        self.cells
            .iter()
            .filter_map(|entry| entry.value().get().map(|v| (entry.key().clone(), v)))
            .collect()
    }

    /// Number of keys that have a published value.
    pub fn computed_len(&self) -> usize {
        self.cells
            .iter()
            .filter(|entry| entry.value().is_computed())
            .count()
    }

    fn cell(&self, key: &K) -> Arc<LazyValue<V>> {
        if let Some(existing) = self.cells.get(key) {
            return Arc::clone(existing.value());
        }
        let entry = self.cells.entry(key.clone()).or_default();
        Arc::clone(entry.value())
    }
}

impl<K, V> Default for MemoizedFunction<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/memoized_tests.rs"]
mod tests;
