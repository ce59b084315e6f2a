//! Memoization for derived values.
//!
//! The store's revision counter is the cache key: a cached value is valid
//! exactly until the next dispatch. That is coarser than per-slice identity
//! tracking but trivially correct, and recomputing a selector once per
//! dispatch is cheap at this scale.

use crate::store::Store;

/// Caches the result of one derivation against the store revision it was
/// computed at.
#[derive(Debug, Default)]
pub struct Memoized<T> {
    cached: Option<(u64, T)>,
}

impl<T> Memoized<T> {
    pub fn new() -> Self {
        Memoized { cached: None }
    }

    /// Return the cached value if it was computed at the store's current
    /// revision, otherwise recompute and cache.
    pub fn get_or_compute<'a>(
        &'a mut self,
        store: &Store,
        compute: impl FnOnce(&Store) -> T,
    ) -> &'a T {
        let revision = store.revision();
        let stale = !matches!(&self.cached, Some((r, _)) if *r == revision);
        if stale {
            self.cached = Some((revision, compute(store)));
        }
        // The branch above guarantees a value is present.
        match &self.cached {
            Some((_, value)) => value,
            None => unreachable!(),
        }
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use std::cell::Cell;

    #[test]
    fn test_cached_value_survives_until_next_dispatch() {
        let mut store = Store::new();
        let mut memo: Memoized<usize> = Memoized::new();
        let computes = Cell::new(0);

        let count = |store: &Store| {
            computes.set(computes.get() + 1);
            store.state().core.entities.contents.by_ref.len()
        };

        assert_eq!(*memo.get_or_compute(&store, count), 0);
        assert_eq!(*memo.get_or_compute(&store, count), 0);
        assert_eq!(computes.get(), 1);

        store.dispatch(Action::CloseModal);
        assert_eq!(*memo.get_or_compute(&store, count), 0);
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let store = Store::new();
        let mut memo: Memoized<u64> = Memoized::new();
        let computes = Cell::new(0);
        let count = |_: &Store| {
            computes.set(computes.get() + 1);
            42u64
        };

        memo.get_or_compute(&store, count);
        memo.invalidate();
        memo.get_or_compute(&store, count);
        assert_eq!(computes.get(), 2);
    }
}
