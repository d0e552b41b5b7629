//! Insertion-ordered cache
//!
//! Records are appended on a miss and never reordered. Over the bound, the
//! oldest record is dropped from the front.

use std::collections::VecDeque;

use crate::args::{args_match, StrictEq};
use crate::options::Options;
use crate::store::{CallCache, Evicted};

/// One memoized call
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRecord<A, R> {
    /// Arguments the record was stored under
    pub args: Vec<A>,
    /// Stored result
    pub result: R,
}

/// FIFO sequence of call records, oldest first
#[derive(Debug)]
pub struct QueueCache<A, R> {
    records: VecDeque<QueueRecord<A, R>>,
    max_size: Option<usize>,
}

impl<A, R> QueueCache<A, R> {
    /// Create an empty cache bounded by `options.max_size`
    pub fn new(options: Options) -> Self {
        let max_size = options.max_size.filter(|&n| n > 0);

        Self {
            records: VecDeque::with_capacity(max_size.map_or(0, |n| n + 1)),
            max_size,
        }
    }

    /// Create an empty unbounded cache
    pub fn unbounded() -> Self {
        Self::new(Options::unbounded())
    }

    /// Live records and their count
    pub fn inspect(&self) -> QueueInspection<'_, A, R> {
        QueueInspection {
            records: &self.records,
            size: self.records.len(),
        }
    }
}

impl<A, R> Default for QueueCache<A, R> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<A: StrictEq, R> CallCache<A, R> for QueueCache<A, R> {
    fn lookup(&mut self, args: &[A]) -> Option<&R> {
        self.records
            .iter()
            .find(|record| args_match(&record.args, args))
            .map(|record| &record.result)
    }

    fn insert(&mut self, args: Vec<A>, result: R) -> Option<Evicted<A, R>> {
        self.records.push_back(QueueRecord { args, result });

        // One insertion grows the queue by one, so one removal restores the bound.
        match self.max_size {
            Some(max) if self.records.len() > max => self
                .records
                .pop_front()
                .map(|record| (record.args, record.result)),
            _ => None,
        }
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}

/// Records of a [`QueueCache`], oldest first, borrowed from the live queue
#[derive(Debug)]
pub struct QueueInspection<'a, A, R> {
    /// Records in insertion order
    pub records: &'a VecDeque<QueueRecord<A, R>>,
    /// Number of records
    pub size: usize,
}
