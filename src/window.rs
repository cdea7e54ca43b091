use crate::drift::{rebuild_segment, sum_item_counts};
use crate::fptree::{sort_transaction, FpTree};
use crate::item::Item;
use std::hash::Hash;
use std::iter;
use std::mem;
use tracing::trace;

/// A run of consecutive transactions summarized by one tree.
#[derive(Debug, Clone)]
pub struct Bucket<T> {
    tree: FpTree<T>,
}

impl<T: Hash + Eq + Ord + Clone> Bucket<T> {
    /// Creates an empty bucket.
    pub fn new() -> Self {
        Self {
            tree: FpTree::new(),
        }
    }

    pub(crate) fn from_tree(tree: FpTree<T>) -> Self {
        Self { tree }
    }

    /// Adds one transaction.
    ///
    /// Duplicate items collapse, and the transaction is sorted under the
    /// bucket's counts as they stand before the insert. Paths are only
    /// guaranteed sorted after [`Bucket::seal`].
    pub fn add(&mut self, mut transaction: Vec<Item<T>>) {
        transaction.sort();
        transaction.dedup();
        let sorted = sort_transaction(&transaction, self.tree.item_count());
        self.tree.insert(&sorted, 1);
    }

    /// Rebuilds the tree so every path is sorted under its final counts.
    pub fn seal(self) -> Self {
        if self.tree.is_empty() {
            return self;
        }
        let item_count = self.tree.item_count().clone();
        let segment = rebuild_segment(std::slice::from_ref(&self), &item_count);
        Self::from_tree(segment.tree)
    }

    /// Merges a run of buckets into one, sorted under the combined counts.
    pub fn merge(buckets: &[Bucket<T>]) -> Self {
        let item_count = sum_item_counts(buckets);
        Self::from_tree(rebuild_segment(buckets, &item_count).tree)
    }

    /// Number of transactions in this bucket.
    pub fn len(&self) -> usize {
        self.tree.num_transactions()
    }

    /// Returns true if the bucket holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The bucket's summary tree.
    pub fn tree(&self) -> &FpTree<T> {
        &self.tree
    }
}

impl<T: Hash + Eq + Ord + Clone> Default for Bucket<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded summary of a transaction stream's recent history.
///
/// The drift detector only needs these four operations; any window that
/// keeps its buckets in chronological order can drive it.
pub trait TransactionWindow<T> {
    /// Adds a transaction. Returns true iff a bucket boundary was just
    /// crossed.
    fn add(&mut self, transaction: Vec<Item<T>>) -> bool;

    /// Number of completed buckets.
    fn len(&self) -> usize;

    /// Returns true if there are no completed buckets.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Completed buckets, oldest first.
    fn buckets(&self) -> &[Bucket<T>];

    /// Drops buckets `0..end`.
    fn remove_prefix(&mut self, end: usize);
}

/// Exponential-histogram window.
///
/// Incoming transactions fill an open bucket. Once it holds `bucket_len`
/// transactions it is sealed and appended, which is the boundary event.
/// Whenever more than `merge_threshold` buckets share a size, the two
/// oldest of that size merge into one of twice the size, so older history
/// is kept at coarser granularity. Sizes never increase from oldest to
/// newest.
#[derive(Debug, Clone)]
pub struct AdaptiveWindow<T> {
    bucket_len: usize,
    merge_threshold: usize,
    buckets: Vec<Bucket<T>>,
    open: Bucket<T>,
}

impl<T: Hash + Eq + Ord + Clone> AdaptiveWindow<T> {
    /// Creates an empty window.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_len` or `merge_threshold` is zero.
    pub fn new(bucket_len: usize, merge_threshold: usize) -> Self {
        assert!(bucket_len > 0, "bucket_len must be positive");
        assert!(merge_threshold > 0, "merge_threshold must be positive");
        Self {
            bucket_len,
            merge_threshold,
            buckets: Vec::new(),
            open: Bucket::new(),
        }
    }

    /// Transactions per freshly sealed bucket.
    pub fn bucket_len(&self) -> usize {
        self.bucket_len
    }

    /// Maximum number of buckets allowed to share a size.
    pub fn merge_threshold(&self) -> usize {
        self.merge_threshold
    }

    /// Transactions held in completed buckets.
    pub fn total_len(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Transactions in the bucket still being filled.
    pub fn pending_len(&self) -> usize {
        self.open.len()
    }

    fn merge_buckets(&mut self) {
        let mut size = self.bucket_len;
        loop {
            // Equal sizes are contiguous since sizes are non-increasing.
            let Some(first) = self.buckets.iter().position(|b| b.len() == size) else {
                break;
            };
            let same = self.buckets[first..]
                .iter()
                .take_while(|b| b.len() == size)
                .count();
            if same <= self.merge_threshold {
                break;
            }

            let merged = Bucket::merge(&self.buckets[first..first + 2]);
            trace!(index = first, size = merged.len(), "merged buckets");
            self.buckets.splice(first..first + 2, iter::once(merged));
            size *= 2;
        }
    }
}

impl<T: Hash + Eq + Ord + Clone> TransactionWindow<T> for AdaptiveWindow<T> {
    fn add(&mut self, transaction: Vec<Item<T>>) -> bool {
        self.open.add(transaction);
        if self.open.len() < self.bucket_len {
            return false;
        }

        let sealed = mem::take(&mut self.open).seal();
        trace!(buckets = self.buckets.len() + 1, "sealed bucket");
        self.buckets.push(sealed);
        self.merge_buckets();
        true
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn buckets(&self) -> &[Bucket<T>] {
        &self.buckets
    }

    fn remove_prefix(&mut self, end: usize) {
        self.buckets.drain(..end);
    }
}
