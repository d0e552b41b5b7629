//! Recency-ordered cache
//!
//! Records live in an arena of slots and are linked by index, head being the
//! most recently used. A hit splices the record to the head in O(1); a miss
//! pushes a new head and, when over the bound, evicts the tail.

use crate::args::{args_match, StrictEq};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::store::{CallCache, Evicted};

/// Node in the recency list
struct Node<A, R> {
    args: Vec<A>,
    result: R,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list of call records, most recently used first
pub struct RecencyCache<A, R> {
    nodes: Vec<Option<Node<A, R>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
    max_size: Option<usize>,
}

impl<A, R> RecencyCache<A, R> {
    /// Create an empty cache bounded by `options.max_size`
    pub fn new(options: Options) -> Self {
        let max_size = options.max_size.filter(|&n| n > 0);

        Self {
            nodes: Vec::with_capacity(max_size.unwrap_or(0)),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
            max_size,
        }
    }

    /// Create an empty unbounded cache
    pub fn unbounded() -> Self {
        Self::new(Options::unbounded())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured bound; `None` is unbounded
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Exact structural view of the list: head, tail and record count
    pub fn inspect(&self) -> RecencyInspection<'_, A, R> {
        RecencyInspection {
            head: self.head.and_then(|idx| self.view(idx)),
            tail: self.tail.and_then(|idx| self.view(idx)),
            size: self.len,
        }
    }

    /// Iterate records from most to least recently used
    pub fn iter(&self) -> Iter<'_, A, R> {
        Iter {
            cache: self,
            cursor: self.head,
        }
    }

    /// Walk the list and verify its links.
    ///
    /// Only the head lacks a predecessor, only the tail lacks a successor,
    /// and every `next` link is mirrored by the neighbour's `prev`.
    pub fn check_invariants(&self) -> Result<()> {
        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        if live != self.len {
            return Err(Error::Invariant(format!(
                "{} live slots but length is {}",
                live, self.len
            )));
        }

        let mut prev = None;
        let mut cursor = self.head;
        let mut walked = 0;

        while let Some(idx) = cursor {
            let node = self
                .slot(idx)
                .ok_or_else(|| Error::Invariant(format!("link to empty slot {}", idx)))?;
            if node.prev != prev {
                return Err(Error::Invariant(format!(
                    "slot {} has prev {:?}, expected {:?}",
                    idx, node.prev, prev
                )));
            }
            walked += 1;
            if walked > self.len {
                return Err(Error::Invariant("cycle in recency list".into()));
            }
            prev = Some(idx);
            cursor = node.next;
        }

        if walked != self.len {
            return Err(Error::Invariant(format!(
                "walked {} records but length is {}",
                walked, self.len
            )));
        }
        if prev != self.tail {
            return Err(Error::Invariant(format!(
                "list ends at {:?} but tail is {:?}",
                prev, self.tail
            )));
        }

        Ok(())
    }

    pub(crate) fn result(&self, idx: usize) -> Option<&R> {
        self.slot(idx).map(|node| &node.result)
    }

    /// Move a record to the head without reallocating it
    pub(crate) fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    /// Insert a record as the new head
    pub(crate) fn push_front(&mut self, args: Vec<A>, result: R) -> usize {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            args,
            result,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;

        idx
    }

    /// Remove the least recently used record
    pub(crate) fn pop_back(&mut self) -> Option<Evicted<A, R>> {
        let tail_idx = self.tail?;
        self.remove(tail_idx)
    }

    pub(crate) fn remove(&mut self, idx: usize) -> Option<Evicted<A, R>> {
        self.slot(idx)?;
        self.unlink(idx);
        self.free_list.push(idx);
        self.len -= 1;
        self.nodes[idx].take().map(|node| (node.args, node.result))
    }

    pub(crate) fn over_bound(&self) -> bool {
        self.max_size.is_some_and(|max| self.len > max)
    }

    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn slot(&self, idx: usize) -> Option<&Node<A, R>> {
        self.nodes.get(idx).and_then(|slot| slot.as_ref())
    }

    fn view(&self, idx: usize) -> Option<RecordView<'_, A, R>> {
        self.slot(idx).map(|node| RecordView { cache: self, node })
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

impl<A: StrictEq, R> RecencyCache<A, R> {
    /// Slot of the first record, walking from the head, whose arguments match
    pub(crate) fn find(&self, args: &[A]) -> Option<usize> {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.slot(idx)?;
            if args_match(&node.args, args) {
                return Some(idx);
            }
            cursor = node.next;
        }
        None
    }
}

impl<A, R> Default for RecencyCache<A, R> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<A: StrictEq, R> CallCache<A, R> for RecencyCache<A, R> {
    fn lookup(&mut self, args: &[A]) -> Option<&R> {
        let idx = self.find(args)?;
        self.promote(idx);
        self.result(idx)
    }

    fn insert(&mut self, args: Vec<A>, result: R) -> Option<Evicted<A, R>> {
        self.push_front(args, result);
        if self.over_bound() {
            self.pop_back()
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn len(&self) -> usize {
        self.len
    }

    fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}

/// Head, tail and size of a [`RecencyCache`], borrowed from the live list
pub struct RecencyInspection<'a, A, R> {
    /// Most recently used record
    pub head: Option<RecordView<'a, A, R>>,
    /// Least recently used record
    pub tail: Option<RecordView<'a, A, R>>,
    /// Number of records
    pub size: usize,
}

/// Borrowed view of one record that can follow its links
pub struct RecordView<'a, A, R> {
    cache: &'a RecencyCache<A, R>,
    node: &'a Node<A, R>,
}

impl<'a, A, R> RecordView<'a, A, R> {
    /// Arguments the record was stored under
    pub fn args(&self) -> &'a [A] {
        &self.node.args
    }

    /// Stored result
    pub fn result(&self) -> &'a R {
        &self.node.result
    }

    /// More recently used neighbour
    pub fn previous(&self) -> Option<RecordView<'a, A, R>> {
        self.node.prev.and_then(|idx| self.cache.view(idx))
    }

    /// Less recently used neighbour
    pub fn next(&self) -> Option<RecordView<'a, A, R>> {
        self.node.next.and_then(|idx| self.cache.view(idx))
    }
}

/// Iterator over `(args, result)` from head to tail
pub struct Iter<'a, A, R> {
    cache: &'a RecencyCache<A, R>,
    cursor: Option<usize>,
}

impl<'a, A, R> Iterator for Iter<'a, A, R> {
    type Item = (&'a [A], &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cache.slot(self.cursor?)?;
        self.cursor = node.next;
        Some((&node.args, &node.result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(cache: &RecencyCache<i32, i32>) -> Vec<Vec<i32>> {
        cache.iter().map(|(args, _)| args.to_vec()).collect()
    }

    #[test]
    fn test_insert_sets_head_and_tail() {
        let mut cache = RecencyCache::unbounded();
        cache.insert(vec![1, 2], 3);

        let view = cache.inspect();
        assert_eq!(view.size, 1);
        assert_eq!(view.head.unwrap().args(), &[1, 2]);
        assert_eq!(view.tail.unwrap().args(), &[1, 2]);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_hit_promotes_to_head() {
        let mut cache = RecencyCache::unbounded();
        cache.insert(vec![1], 1);
        cache.insert(vec![2], 2);
        cache.insert(vec![3], 3);
        cache.insert(vec![4], 4);
        assert_eq!(order(&cache), vec![vec![4], vec![3], vec![2], vec![1]]);

        // Middle record: former head becomes its successor
        assert_eq!(cache.lookup(&[2]), Some(&2));
        assert_eq!(order(&cache), vec![vec![2], vec![4], vec![3], vec![1]]);
        cache.check_invariants().unwrap();

        // Tail record: tail moves to its predecessor
        assert_eq!(cache.lookup(&[1]), Some(&1));
        assert_eq!(order(&cache), vec![vec![1], vec![2], vec![4], vec![3]]);
        assert_eq!(cache.inspect().tail.unwrap().args(), &[3]);
        cache.check_invariants().unwrap();

        // Head record: no change
        assert_eq!(cache.lookup(&[1]), Some(&1));
        assert_eq!(order(&cache), vec![vec![1], vec![2], vec![4], vec![3]]);
    }

    #[test]
    fn test_links_walk_both_ways() {
        let mut cache = RecencyCache::unbounded();
        for i in 0..4 {
            cache.insert(vec![i], i * 10);
        }

        let inspection = cache.inspect();
        let head = inspection.head.unwrap();
        assert!(head.previous().is_none());

        let second = head.next().unwrap();
        assert_eq!(second.previous().unwrap().args(), head.args());
        assert_eq!(*second.result(), 20);

        let tail = inspection.tail.unwrap();
        assert!(tail.next().is_none());
        assert_eq!(tail.previous().unwrap().args(), &[1]);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = RecencyCache::new(Options::max_size(2));

        assert!(cache.insert(vec![1], 1).is_none());
        assert!(cache.insert(vec![2], 2).is_none());
        cache.lookup(&[1]);

        let evicted = cache.insert(vec![3], 3);
        assert_eq!(evicted, Some((vec![2], 2)));
        assert_eq!(order(&cache), vec![vec![3], vec![1]]);
        assert_eq!(cache.len(), 2);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_bound_of_one() {
        let mut cache = RecencyCache::new(Options::max_size(1));

        cache.insert(vec![1], 1);
        let evicted = cache.insert(vec![2], 2);

        assert_eq!(evicted, Some((vec![1], 1)));
        let view = cache.inspect();
        assert_eq!(view.size, 1);
        assert_eq!(view.head.unwrap().args(), &[2]);
        assert_eq!(view.tail.unwrap().args(), &[2]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_zero_bound_is_unbounded() {
        let mut cache = RecencyCache::new(Options { max_size: Some(0) });
        for i in 0..10 {
            assert!(cache.insert(vec![i], i).is_none());
        }
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.max_size(), None);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut cache = RecencyCache::new(Options::max_size(2));
        for i in 0..100 {
            cache.insert(vec![i], i);
        }
        assert_eq!(cache.nodes.len(), 3);
        assert_eq!(order(&cache), vec![vec![99], vec![98]]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_arity_mismatch_misses() {
        let mut cache = RecencyCache::unbounded();
        cache.insert(vec![5, 7], 12);

        assert!(cache.lookup(&[5]).is_none());
        assert!(cache.lookup(&[5, 7, 0]).is_none());
        assert_eq!(cache.lookup(&[5, 7]), Some(&12));
    }

    #[test]
    fn test_clear() {
        let mut cache = RecencyCache::unbounded();
        cache.insert(vec![1], 1);
        cache.insert(vec![2], 2);
        cache.clear();

        let view = cache.inspect();
        assert_eq!(view.size, 0);
        assert!(view.head.is_none());
        assert!(view.tail.is_none());
        assert!(cache.lookup(&[1]).is_none());

        cache.clear();
        assert!(cache.is_empty());
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_invariant_violation_detected() {
        let mut cache = RecencyCache::unbounded();
        cache.insert(vec![1], 1);
        cache.insert(vec![2], 2);

        cache.tail = cache.head;
        assert!(matches!(cache.check_invariants(), Err(Error::Invariant(_))));
    }
}
