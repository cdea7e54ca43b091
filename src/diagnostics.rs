//! Offline measures of how much a tree's ordering disagrees with another
//! frequency table. Nothing here feeds the online drift decision.

use crate::fptree::{sort_transaction, FpTree, ItemCount};
use std::hash::Hash;

/// How far the paths of `tree` move when re-sorted under
/// `other_item_count`.
///
/// For every stored path, the Levenshtein distance between the path and
/// its re-sort is squared and divided by the squared path length. The
/// per-path terms are summed and divided by the tree's transaction count.
/// Identical orderings give `0.0`.
///
/// # Panics
///
/// Panics if `tree` is not sorted under its own item counts.
pub fn tree_global_change<T: Hash + Eq + Ord + Clone>(
    tree: &FpTree<T>,
    other_item_count: &ItemCount<T>,
) -> f64 {
    assert!(tree.is_sorted(), "tree_global_change requires a sorted tree");
    if tree.is_empty() {
        return 0.0;
    }

    let mut change = 0.0;
    for (path, _) in tree {
        if path.is_empty() {
            continue;
        }
        let resorted = sort_transaction(&path, other_item_count);
        let distance = levenshtein_distance(&path, &resorted) as f64;
        let len = path.len() as f64;
        change += (distance * distance) / (len * len);
    }
    change / tree.num_transactions() as f64
}

/// Minimum number of single-element insertions, deletions and
/// substitutions turning `a` into `b`.
pub fn levenshtein_distance<E: PartialEq>(a: &[E], b: &[E]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single row of the DP table.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, x) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = if x == y { 0 } else { 1 };
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}
