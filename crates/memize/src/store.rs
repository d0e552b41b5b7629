//! Storage seam shared by every cache strategy

/// A record removed to enforce a size bound: its arguments and result.
pub type Evicted<A, R> = (Vec<A>, R);

/// Storage strategy behind a memoized function.
///
/// A strategy only stores and finds call records. Invoking the wrapped
/// function, statistics and logging belong to [`Memoized`](crate::Memoized).
pub trait CallCache<A, R> {
    /// Find the record stored for `args`, applying any hit-side reordering.
    fn lookup(&mut self, args: &[A]) -> Option<&R>;

    /// Store a freshly computed record.
    ///
    /// # Returns
    /// * `Option<Evicted<A, R>>` - The record dropped to stay within the bound, if any
    fn insert(&mut self, args: Vec<A>, result: R) -> Option<Evicted<A, R>>;

    /// Drop every record.
    fn clear(&mut self);

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Check if no records are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured bound; `None` is unbounded.
    fn max_size(&self) -> Option<usize>;
}
