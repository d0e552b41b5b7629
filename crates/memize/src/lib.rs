//! # memize
//!
//! Function-result memoization over raw argument sequences.
//!
//! ## Architecture
//! - **Matching**: positional [`StrictEq`] comparison, no hashing or deep equality
//! - **RecencyCache**: index-linked list, hits move to the head, the tail is evicted
//! - **QueueCache**: append-only queue, the oldest record is evicted
//! - **IndexedCache**: recency list plus an AHash index, opt-in for `Hash + Eq` arguments
//! - **Memoized**: wraps a function with any [`CallCache`] strategy
//!
//! ## Example
//! ```
//! use memize::{memoize_with, Options};
//!
//! let mut add = memoize_with(|args: &[i32]| args[0] + args[1], Options::max_size(2));
//! assert_eq!(add.call(&[1, 2]), 3);
//! assert_eq!(add.call(&[1, 2]), 3);
//! assert_eq!(add.stats().hits(), 1);
//! ```

#![warn(missing_docs)]

mod args;
mod error;
mod indexed;
mod memoized;
mod options;
mod queue;
mod recency;
mod shared;
mod stats;
mod store;

pub use args::{args_match, StrictEq};
pub use error::{Error, Result};
pub use indexed::IndexedCache;
pub use memoized::{
    memoize, memoize_indexed_with, memoize_queue, memoize_queue_with, memoize_with,
    try_memoize_with, Memoized,
};
pub use options::Options;
pub use queue::{QueueCache, QueueInspection, QueueRecord};
pub use recency::{Iter, RecencyCache, RecencyInspection, RecordView};
pub use shared::SharedMemoized;
pub use stats::CacheStats;
pub use store::{CallCache, Evicted};
