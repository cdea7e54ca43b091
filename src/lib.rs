//! # cdtds - Change Detection in Transaction Data Streams
//!
//! Detects concept drift in an unbounded stream of transactions (sets of
//! items, e.g. market baskets) using bounded memory.
//!
//! Recent history is summarized by an exponential-histogram window of
//! buckets, each holding a prefix-sharing FP-tree. Every time a bucket
//! fills, the window is scanned from the most recent bucket boundary
//! backwards for a split where some item's support differs by more than a
//! concentration bound. The first such split wins:
//! 1. **Prune**: buckets before the split are dropped
//! 2. **Emit**: the surviving buckets are rebuilt into a fresh tree, sorted
//!    under their own item frequencies, and handed to the caller
//!
//! ## Example
//!
//! ```
//! use cdtds_rs::{detect_drift, DriftConfig, Item};
//!
//! let before = (0..300).map(|i| if i % 10 == 0 { vec!["bread"] } else { vec!["milk", "bread"] });
//! let after = (0..300).map(|i| if i % 10 == 0 { vec!["milk", "bread"] } else { vec!["bread"] });
//!
//! let detections: Vec<_> = detect_drift(before.chain(after), &DriftConfig::default())
//!     .unwrap()
//!     .collect();
//!
//! let last = detections.last().expect("drift should be detected");
//! assert!(last.transactions_consumed > 300);
//! let milk = last.tree.item_count().get(&Item::new("milk")).copied().unwrap_or(0);
//! assert!(milk * 2 < last.tree.num_transactions());
//! ```
//!
//! ## Performance
//!
//! - Detection runs only at bucket boundaries
//! - One boundary check costs O(buckets × distinct items)
//! - Tree nodes live in a generational arena (SlotMap)

mod config;
mod diagnostics;
mod drift;
mod error;
mod fptree;
mod fptree_iter;
mod item;
mod stats;
mod stream;
mod window;

#[cfg(test)]
mod tests;

pub use config::DriftConfig;
pub use diagnostics::{levenshtein_distance, tree_global_change};
pub use drift::{find_concept_drift, rebuild_segment, sum_item_counts, DriftCut, RebuiltSegment};
pub use error::ConfigError;
pub use fptree::{sort_transaction, FpTree, ItemCount};
pub use fptree_iter::PathIter;
pub use item::Item;
pub use stats::{epsilon, variance};
pub use stream::{detect_drift, Detection, DriftDetector, DriftStream};
pub use window::{AdaptiveWindow, Bucket, TransactionWindow};
