use crate::fptree::{sort_transaction, FpTree, ItemCount};
use crate::stats::epsilon;
use crate::window::Bucket;
use std::hash::Hash;
use tracing::info;

/// A confirmed drift: where the window splits and a summary of everything
/// after the split.
#[derive(Debug, Clone)]
pub struct DriftCut<T> {
    /// Index of the first bucket of the post-change segment.
    pub cut_index: usize,
    /// Tree over buckets `cut_index..`, sorted under their own counts.
    pub tree: FpTree<T>,
    /// Mean path length of `tree`, weighted by count.
    pub avg_path_len: f64,
}

/// Output of [`rebuild_segment`].
#[derive(Debug, Clone)]
pub struct RebuiltSegment<T> {
    /// Fresh tree holding every transaction of the run, with multiplicity.
    pub tree: FpTree<T>,
    /// Mean path length of `tree`, weighted by count.
    pub avg_path_len: f64,
}

/// Sums the item counts of a run of buckets.
pub fn sum_item_counts<T: Hash + Eq + Ord + Clone>(buckets: &[Bucket<T>]) -> ItemCount<T> {
    let mut total = ItemCount::default();
    for bucket in buckets {
        for (item, &count) in bucket.tree().item_count().iter() {
            *total.entry(item.clone()).or_insert(0) += count;
        }
    }
    total
}

/// Re-sorts every transaction held by `buckets` under `item_count` and
/// inserts it, with its multiplicity, into a new tree.
///
/// The new tree shares nothing with the bucket trees. When `item_count` is
/// the run's own table, the result is sorted.
///
/// # Panics
///
/// Panics if the buckets hold no transactions.
pub fn rebuild_segment<T: Hash + Eq + Ord + Clone>(
    buckets: &[Bucket<T>],
    item_count: &ItemCount<T>,
) -> RebuiltSegment<T> {
    let mut tree = FpTree::new();
    let mut path_len_sum = 0usize;
    let mut path_count = 0usize;

    for bucket in buckets {
        for (transaction, count) in bucket.tree() {
            let sorted = sort_transaction(&transaction, item_count);
            path_len_sum += count * sorted.len();
            path_count += count;
            tree.insert(&sorted, count);
        }
    }

    assert!(path_count > 0, "cannot rebuild an empty segment");
    RebuiltSegment {
        tree,
        avg_path_len: path_len_sum as f64 / path_count as f64,
    }
}

/// Searches `window` for the most recent bucket boundary where some item's
/// support differs significantly between the data before and after it.
///
/// Candidates are scanned from `len - 2` down to `0`, and the first one
/// where any item's support difference reaches [`epsilon`] is returned.
/// Candidates with fewer than `min_cut_len` transactions on either side
/// are skipped. Returns `None` if the window has fewer than two buckets
/// or no candidate qualifies.
///
/// # Panics
///
/// Panics if `min_cut_len` is zero or `local_cut_confidence` is outside
/// `(0, 1]`.
pub fn find_concept_drift<T: Hash + Eq + Ord + Clone>(
    window: &[Bucket<T>],
    min_cut_len: usize,
    local_cut_confidence: f64,
) -> Option<DriftCut<T>> {
    assert!(min_cut_len > 0, "min_cut_len must be positive");
    assert!(
        local_cut_confidence > 0.0 && local_cut_confidence <= 1.0,
        "local_cut_confidence must be in (0, 1], got {}",
        local_cut_confidence
    );

    if window.len() < 2 {
        return None;
    }

    let last = window.len() - 2;
    let mut before_count = sum_item_counts(&window[..last]);
    let mut after_count = sum_item_counts(&window[last..]);
    let mut before_len: usize = window[..last].iter().map(Bucket::len).sum();
    let mut after_len: usize = window[last..].iter().map(Bucket::len).sum();

    for cut_index in (0..=last).rev() {
        if cut_index < last {
            // Bucket `cut_index` crosses from the before side to the after side.
            let moved = &window[cut_index];
            before_len -= moved.len();
            after_len += moved.len();
            for (item, &count) in moved.tree().item_count().iter() {
                *after_count.entry(item.clone()).or_insert(0) += count;
                if let Some(before) = before_count.get_mut(item) {
                    *before -= count;
                }
            }
        }

        if before_len < min_cut_len || after_len < min_cut_len {
            continue;
        }

        for (item, &after_item) in after_count.iter() {
            let before_item = before_count.get(item).copied().unwrap_or(0);
            let before_support = before_item as f64 / before_len as f64;
            let after_support = after_item as f64 / after_len as f64;
            let eps = epsilon(
                before_len,
                after_len,
                before_support,
                after_support,
                local_cut_confidence,
            );

            if (before_support - after_support).abs() >= eps {
                info!(
                    cut_index,
                    before_len,
                    after_len,
                    before_support,
                    after_support,
                    epsilon = eps,
                    "concept drift detected"
                );
                let segment = rebuild_segment(&window[cut_index..], &after_count);
                return Some(DriftCut {
                    cut_index,
                    tree: segment.tree,
                    avg_path_len: segment.avg_path_len,
                });
            }
        }
    }

    None
}
