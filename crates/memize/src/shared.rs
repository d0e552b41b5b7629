//! Thread-safe memoized function
//!
//! A [`Memoized`] is single-threaded: lookup followed by insert is not
//! atomic. [`SharedMemoized`] puts the whole call behind one mutex so a
//! memoized function can be shared across threads. The lock is held while
//! the wrapped function runs, so concurrent misses on the same arguments
//! compute the result once.

use parking_lot::Mutex;

use crate::memoized::Memoized;
use crate::recency::RecencyCache;
use crate::store::CallCache;

/// A [`Memoized`] function guarded by a mutex
pub struct SharedMemoized<A, R, F, C = RecencyCache<A, R>> {
    inner: Mutex<Memoized<A, R, F, C>>,
}

impl<A, R, F, C> SharedMemoized<A, R, F, C>
where
    C: CallCache<A, R>,
{
    /// Share an existing memoized function
    pub fn new(memoized: Memoized<A, R, F, C>) -> Self {
        Self {
            inner: Mutex::new(memoized),
        }
    }

    /// Drop every stored record
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Run `f` against the locked memoized function, e.g. to read stats or inspect
    pub fn with<T>(&self, f: impl FnOnce(&Memoized<A, R, F, C>) -> T) -> T {
        f(&self.inner.lock())
    }

    /// Unwrap the inner memoized function
    pub fn into_inner(self) -> Memoized<A, R, F, C> {
        self.inner.into_inner()
    }
}

impl<A, R, F, C> SharedMemoized<A, R, F, C>
where
    A: Clone,
    R: Clone,
    C: CallCache<A, R>,
{
    /// Call the function under the lock
    pub fn call(&self, args: &[A]) -> R
    where
        F: FnMut(&[A]) -> R,
    {
        self.inner.lock().call(args)
    }

    /// Call a fallible function under the lock
    pub fn try_call<E>(&self, args: &[A]) -> Result<R, E>
    where
        F: FnMut(&[A]) -> Result<R, E>,
    {
        self.inner.lock().try_call(args)
    }
}

impl<A, R, F, C> From<Memoized<A, R, F, C>> for SharedMemoized<A, R, F, C>
where
    C: CallCache<A, R>,
{
    fn from(memoized: Memoized<A, R, F, C>) -> Self {
        Self::new(memoized)
    }
}
