//! Memoized function wrapper
//!
//! [`Memoized`] pairs a function with one [`CallCache`] strategy. A call
//! whose arguments match a stored record returns a clone of the stored
//! result; any other call invokes the function on a private copy of the
//! arguments and stores the result.

use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::args::StrictEq;
use crate::indexed::IndexedCache;
use crate::options::Options;
use crate::queue::QueueCache;
use crate::recency::RecencyCache;
use crate::stats::CacheStats;
use crate::store::CallCache;

/// A function wrapped with a result cache
pub struct Memoized<A, R, F, C = RecencyCache<A, R>> {
    /// Wrapped function
    func: F,

    /// Stored call records
    cache: C,

    /// Hit/miss counters
    stats: CacheStats,

    _marker: PhantomData<fn(&[A]) -> R>,
}

impl<A, R, F, C> Memoized<A, R, F, C>
where
    C: CallCache<A, R>,
{
    /// Wrap `func` with the given cache strategy
    pub fn with_cache(func: F, cache: C) -> Self {
        debug!(max_size = ?cache.max_size(), "memoizing function");

        Self {
            func,
            cache,
            stats: CacheStats::new(),
            _marker: PhantomData,
        }
    }

    /// Drop every stored record and reset the statistics
    pub fn clear(&mut self) {
        debug!(records = self.cache.len(), "clearing memoized results");
        self.cache.clear();
        self.stats.reset();
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get call statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Borrow the cache strategy, e.g. to inspect it
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Options the cache was built with
    pub fn options(&self) -> Options {
        Options {
            max_size: self.cache.max_size(),
        }
    }

    fn store(&mut self, args: Vec<A>, result: R) {
        if let Some((evicted, _)) = self.cache.insert(args, result) {
            self.stats.record_eviction();
            trace!(arity = evicted.len(), size = self.cache.len(), "evicted record");
        }
    }
}

impl<A, R, F, C> Memoized<A, R, F, C>
where
    A: Clone,
    R: Clone,
    C: CallCache<A, R>,
{
    /// Call the function, answering from the cache when possible
    ///
    /// # Arguments
    /// * `args` - Argument sequence, matched positionally against stored records
    ///
    /// # Returns
    /// * `R` - Stored or freshly computed result
    pub fn call(&mut self, args: &[A]) -> R
    where
        F: FnMut(&[A]) -> R,
    {
        if let Some(result) = self.cache.lookup(args) {
            self.stats.record_hit();
            trace!(arity = args.len(), "cache hit");
            return result.clone();
        }

        self.stats.record_miss();
        trace!(arity = args.len(), "cache miss");

        let args = args.to_vec();
        let result = (self.func)(&args);
        self.store(args, result.clone());

        result
    }

    /// Call a fallible function, caching only successful results
    ///
    /// An `Err` is returned unchanged and nothing is stored, so the next call
    /// with the same arguments invokes the function again.
    pub fn try_call<E>(&mut self, args: &[A]) -> Result<R, E>
    where
        F: FnMut(&[A]) -> Result<R, E>,
    {
        if let Some(result) = self.cache.lookup(args) {
            self.stats.record_hit();
            trace!(arity = args.len(), "cache hit");
            return Ok(result.clone());
        }

        self.stats.record_miss();
        trace!(arity = args.len(), "cache miss");

        let args = args.to_vec();
        let result = match (self.func)(&args) {
            Ok(result) => result,
            Err(err) => {
                self.stats.record_failure();
                trace!(arity = args.len(), "wrapped call failed; nothing stored");
                return Err(err);
            }
        };
        self.store(args, result.clone());

        Ok(result)
    }
}

/// Memoize `func` in an unbounded recency-ordered cache
pub fn memoize<A, R, F>(func: F) -> Memoized<A, R, F>
where
    A: StrictEq,
    F: FnMut(&[A]) -> R,
{
    memoize_with(func, Options::unbounded())
}

/// Memoize `func` in a recency-ordered cache
pub fn memoize_with<A, R, F>(func: F, options: Options) -> Memoized<A, R, F>
where
    A: StrictEq,
    F: FnMut(&[A]) -> R,
{
    Memoized::with_cache(func, RecencyCache::new(options))
}

/// Memoize a fallible `func` in a recency-ordered cache; use [`Memoized::try_call`]
pub fn try_memoize_with<A, R, E, F>(func: F, options: Options) -> Memoized<A, R, F>
where
    A: StrictEq,
    F: FnMut(&[A]) -> Result<R, E>,
{
    Memoized::with_cache(func, RecencyCache::new(options))
}

/// Memoize `func` in an unbounded insertion-ordered cache
pub fn memoize_queue<A, R, F>(func: F) -> Memoized<A, R, F, QueueCache<A, R>>
where
    A: StrictEq,
    F: FnMut(&[A]) -> R,
{
    memoize_queue_with(func, Options::unbounded())
}

/// Memoize `func` in an insertion-ordered cache
pub fn memoize_queue_with<A, R, F>(
    func: F,
    options: Options,
) -> Memoized<A, R, F, QueueCache<A, R>>
where
    A: StrictEq,
    F: FnMut(&[A]) -> R,
{
    Memoized::with_cache(func, QueueCache::new(options))
}

/// Memoize `func` in a recency-ordered cache with hashed lookup
pub fn memoize_indexed_with<A, R, F>(
    func: F,
    options: Options,
) -> Memoized<A, R, F, IndexedCache<A, R>>
where
    A: Hash + Eq + Clone,
    F: FnMut(&[A]) -> R,
{
    Memoized::with_cache(func, IndexedCache::new(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_memoize_basic() {
        let calls = Cell::new(0);
        let mut add = memoize(|args: &[i32]| {
            calls.set(calls.get() + 1);
            args.iter().sum::<i32>()
        });

        assert_eq!(add.call(&[5, 7]), 12);
        assert_eq!(add.call(&[5, 7]), 12);

        assert_eq!(calls.get(), 1);
        assert_eq!(add.stats().hits(), 1);
        assert_eq!(add.stats().misses(), 1);
    }

    #[test]
    fn test_recency_scenario() {
        let calls = Cell::new(0);
        let mut add = memoize_with(
            |args: &[i32]| {
                calls.set(calls.get() + 1);
                args[0] + args[1]
            },
            Options::max_size(2),
        );

        assert_eq!(add.call(&[1, 2]), 3);
        assert_eq!(calls.get(), 1);
        assert_eq!(add.call(&[3, 4]), 7);
        assert_eq!(calls.get(), 2);
        assert_eq!(add.call(&[5, 6]), 11);
        assert_eq!(calls.get(), 3);
        assert_eq!(add.call(&[1, 2]), 3);
        assert_eq!(calls.get(), 4);

        let view = add.cache().inspect();
        assert_eq!(view.size, 2);
        assert_eq!(view.head.unwrap().args(), &[1, 2]);
        assert_eq!(view.tail.unwrap().args(), &[5, 6]);

        assert_eq!(add.call(&[5, 6]), 11);
        assert_eq!(calls.get(), 4);
        assert_eq!(add.call(&[1, 2]), 3);
        assert_eq!(calls.get(), 4);
        assert_eq!(add.call(&[3, 4]), 7);
        assert_eq!(calls.get(), 5);
        assert_eq!(add.stats().evictions(), 3);
    }

    #[test]
    fn test_queue_scenario() {
        let calls = Cell::new(0);
        let mut add = memoize_queue_with(
            |args: &[i32]| {
                calls.set(calls.get() + 1);
                args[0] + args[1]
            },
            Options::max_size(2),
        );

        add.call(&[1, 2]);
        add.call(&[3, 4]);
        add.call(&[5, 6]);

        let stored: Vec<_> = add
            .cache()
            .inspect()
            .records
            .iter()
            .map(|r| r.args.clone())
            .collect();
        assert_eq!(stored, vec![vec![3, 4], vec![5, 6]]);

        add.call(&[1, 2]);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_defensive_copy() {
        let mut seen = Vec::new();
        let mut echo = memoize(|args: &[i32]| {
            seen.push(args.to_vec());
            args.len()
        });

        let mut args = vec![1, 2];
        echo.call(&args);
        args[0] = 9;
        echo.call(&args);

        let view = echo.cache().inspect();
        assert_eq!(view.tail.unwrap().args(), &[1, 2]);
        assert_eq!(view.head.unwrap().args(), &[9, 2]);
        drop(echo);
        assert_eq!(seen, vec![vec![1, 2], vec![9, 2]]);
    }

    #[test]
    fn test_try_call_does_not_store_errors() {
        let calls = Cell::new(0);
        let mut divide = try_memoize_with(
            |args: &[i32]| {
                calls.set(calls.get() + 1);
                if args[1] == 0 {
                    Err("division by zero")
                } else {
                    Ok(args[0] / args[1])
                }
            },
            Options::unbounded(),
        );

        assert_eq!(divide.try_call(&[1, 0]), Err("division by zero"));
        assert!(divide.is_empty());
        assert_eq!(divide.try_call(&[1, 0]), Err("division by zero"));
        assert_eq!(calls.get(), 2);
        assert_eq!(divide.stats().failures(), 2);

        assert_eq!(divide.try_call(&[8, 2]), Ok(4));
        assert_eq!(divide.try_call(&[8, 2]), Ok(4));
        assert_eq!(calls.get(), 3);
        assert_eq!(divide.len(), 1);
    }

    #[test]
    fn test_panic_leaves_cache_untouched() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let mut checked = memoize(|args: &[u32]| {
            assert!(args[0] < 10, "too large");
            args[0] * 2
        });

        assert_eq!(checked.call(&[3]), 6);
        let outcome = catch_unwind(AssertUnwindSafe(|| checked.call(&[30])));

        assert!(outcome.is_err());
        assert_eq!(checked.len(), 1);
        checked.cache().check_invariants().unwrap();
    }

    #[test]
    fn test_clear() {
        let calls = Cell::new(0);
        let mut add = memoize(|args: &[i32]| {
            calls.set(calls.get() + 1);
            args[0] + args[1]
        });

        add.call(&[5, 7]);
        add.clear();
        assert!(add.is_empty());
        assert_eq!(add.stats().calls(), 0);

        add.call(&[5, 7]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_indexed_memoize() {
        let calls = Cell::new(0);
        let mut add = memoize_indexed_with(
            |args: &[i64]| {
                calls.set(calls.get() + 1);
                args.iter().sum::<i64>()
            },
            Options::max_size(2),
        );

        add.call(&[1, 2]);
        add.call(&[3, 4]);
        add.call(&[1, 2]);
        add.call(&[5, 6]); // Evicts [3, 4]
        add.call(&[3, 4]);

        assert_eq!(calls.get(), 4);
        assert_eq!(add.options(), Options::max_size(2));
    }
}
