//! Recency-ordered cache with hashed lookup
//!
//! Same eviction order as [`RecencyCache`](crate::RecencyCache), but hits are
//! found through an AHash map keyed by the argument vector instead of a walk
//! from the head. Keys compare with `Eq`, so `Rc` arguments match by value
//! here rather than by identity.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::options::Options;
use crate::recency::RecencyCache;
use crate::store::{CallCache, Evicted};

/// Recency list plus a hash index of argument vectors
pub struct IndexedCache<A, R> {
    map: HashMap<Vec<A>, usize, RandomState>,
    list: RecencyCache<A, R>,
}

impl<A, R> IndexedCache<A, R>
where
    A: Hash + Eq + Clone,
{
    /// Create an empty cache bounded by `options.max_size`
    pub fn new(options: Options) -> Self {
        let capacity = options.max_size.unwrap_or(0);

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            list: RecencyCache::new(options),
        }
    }

    /// Create an empty unbounded cache
    pub fn unbounded() -> Self {
        Self::new(Options::unbounded())
    }

    /// The underlying recency list, for inspection
    pub fn list(&self) -> &RecencyCache<A, R> {
        &self.list
    }
}

impl<A, R> CallCache<A, R> for IndexedCache<A, R>
where
    A: Hash + Eq + Clone,
{
    fn lookup(&mut self, args: &[A]) -> Option<&R> {
        let &idx = self.map.get(args)?;
        self.list.promote(idx);
        self.list.result(idx)
    }

    fn insert(&mut self, args: Vec<A>, result: R) -> Option<Evicted<A, R>> {
        if let Some(stale) = self.map.remove(&args) {
            self.list.remove(stale);
        }

        let key = args.clone();
        let idx = self.list.push_front(args, result);
        self.map.insert(key, idx);

        if !self.list.over_bound() {
            return None;
        }
        let evicted = self.list.pop_back()?;
        self.map.remove(&evicted.0);
        Some(evicted)
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.reset();
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn max_size(&self) -> Option<usize> {
        self.list.max_size()
    }
}
