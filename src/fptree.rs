use crate::item::Item;
use ahash::AHashMap as HashMap;
use slotmap::{DefaultKey, SlotMap};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// Per-item occurrence counts over a set of transactions.
pub type ItemCount<T> = HashMap<Item<T>, usize>;

/// A node in the prefix tree.
///
/// `count` is the number of stored transactions whose path passes through
/// this node, including the ones that end here.
#[derive(Debug, Clone)]
pub(crate) struct FpNode<T> {
    /// `None` only for the root.
    pub item: Option<Item<T>>,
    pub count: usize,
    pub parent: Option<DefaultKey>,
    pub children: HashMap<Item<T>, DefaultKey>,
}

impl<T> FpNode<T> {
    pub(crate) fn new(item: Option<Item<T>>, parent: Option<DefaultKey>) -> Self {
        Self {
            item,
            count: 0,
            parent,
            children: HashMap::default(),
        }
    }
}

/// Prefix-sharing summary tree over sorted transactions.
///
/// Transactions are stored as root-to-node paths. Two transactions that
/// sort to the same sequence share one path and their counts are summed.
/// Nodes live in a SlotMap arena and reference each other by key.
#[derive(Clone)]
pub struct FpTree<T> {
    pub(crate) nodes: SlotMap<DefaultKey, FpNode<T>>,
    pub(crate) root: DefaultKey,
    item_count: ItemCount<T>,
}

impl<T: Hash + Eq + Ord + Clone> FpTree<T> {
    /// Creates an empty tree holding only the root node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::new();
        let root = nodes.insert(FpNode::new(None, None));
        Self {
            nodes,
            root,
            item_count: HashMap::default(),
        }
    }

    /// Inserts `transaction` with multiplicity `count`.
    ///
    /// The transaction is stored in the order given; callers sort it with
    /// [`sort_transaction`] first if path sharing is wanted.
    pub fn insert(&mut self, transaction: &[Item<T>], count: usize) {
        if count == 0 {
            return;
        }

        let mut current = self.root;
        self.nodes[current].count += count;

        for item in transaction {
            let child = match self.nodes[current].children.get(item) {
                Some(&key) => key,
                None => {
                    let key = self
                        .nodes
                        .insert(FpNode::new(Some(item.clone()), Some(current)));
                    self.nodes[current].children.insert(item.clone(), key);
                    key
                }
            };

            self.nodes[child].count += count;
            *self.item_count.entry(item.clone()).or_insert(0) += count;
            current = child;
        }
    }

    /// Total number of transactions stored, counting multiplicities.
    pub fn num_transactions(&self) -> usize {
        self.nodes[self.root].count
    }

    /// Returns true if no transactions have been inserted.
    pub fn is_empty(&self) -> bool {
        self.num_transactions() == 0
    }

    /// Number of item nodes, excluding the root.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Occurrence count of every item in the tree.
    pub fn item_count(&self) -> &ItemCount<T> {
        &self.item_count
    }

    /// Returns true if every stored path is in descending-frequency order
    /// under this tree's own item counts.
    pub fn is_sorted(&self) -> bool {
        self.iter()
            .all(|(path, _)| sort_transaction(&path, &self.item_count) == path)
    }
}

impl<T: Hash + Eq + Ord + Clone> Default for FpTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FpTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FpTree")
            .field("num_transactions", &self.nodes[self.root].count)
            .field("num_nodes", &(self.nodes.len() - 1))
            .field("distinct_items", &self.item_count.len())
            .finish()
    }
}

/// Sorts `transaction` by descending frequency under `item_count`.
///
/// Items missing from the table count as zero. Equal frequencies fall back
/// to ascending item order, so the result is deterministic and sorting an
/// already sorted transaction returns it unchanged.
pub fn sort_transaction<T: Hash + Eq + Ord + Clone>(
    transaction: &[Item<T>],
    item_count: &ItemCount<T>,
) -> Vec<Item<T>> {
    let mut sorted = transaction.to_vec();
    sorted.sort_by(|a, b| compare_by_frequency(a, b, item_count));
    sorted
}

fn compare_by_frequency<T: Hash + Eq + Ord>(
    a: &Item<T>,
    b: &Item<T>,
    item_count: &ItemCount<T>,
) -> Ordering {
    let freq_a = item_count.get(a).copied().unwrap_or(0);
    let freq_b = item_count.get(b).copied().unwrap_or(0);
    freq_b.cmp(&freq_a).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(raw: &[char]) -> Vec<Item<char>> {
        raw.iter().copied().map(Item::new).collect()
    }

    #[test]
    fn test_new() {
        let tree = FpTree::<char>::new();
        assert_eq!(tree.num_transactions(), 0);
        assert_eq!(tree.num_nodes(), 0);
        assert!(tree.is_empty());
        assert!(tree.item_count().is_empty());
    }

    #[test]
    fn test_insert_counts() {
        let mut tree = FpTree::new();
        tree.insert(&items(&['a', 'b']), 3);
        tree.insert(&items(&['a']), 2);

        assert_eq!(tree.num_transactions(), 5);
        assert_eq!(tree.item_count()[&Item::new('a')], 5);
        assert_eq!(tree.item_count()[&Item::new('b')], 3);
    }

    #[test]
    fn test_shared_prefix() {
        let mut tree = FpTree::new();
        tree.insert(&items(&['a', 'b', 'c']), 1);
        tree.insert(&items(&['a', 'b', 'd']), 1);

        // a -> b -> {c, d}
        assert_eq!(tree.num_nodes(), 4);
    }

    #[test]
    fn test_identical_paths_collapse() {
        let mut tree = FpTree::new();
        tree.insert(&items(&['x', 'y']), 2);
        tree.insert(&items(&['x', 'y']), 4);

        let paths: Vec<_> = tree.iter().collect();
        assert_eq!(paths, vec![(items(&['x', 'y']), 6)]);
    }

    #[test]
    fn test_zero_count_ignored() {
        let mut tree = FpTree::new();
        tree.insert(&items(&['a']), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.num_nodes(), 0);
    }

    #[test]
    fn test_sort_transaction_by_frequency() {
        let mut counts = ItemCount::default();
        counts.insert(Item::new('a'), 1);
        counts.insert(Item::new('b'), 5);
        counts.insert(Item::new('c'), 3);

        let sorted = sort_transaction(&items(&['a', 'b', 'c']), &counts);
        assert_eq!(sorted, items(&['b', 'c', 'a']));
    }

    #[test]
    fn test_sort_transaction_tie_break() {
        let mut counts = ItemCount::default();
        counts.insert(Item::new('z'), 2);
        counts.insert(Item::new('m'), 2);

        // Unknown items count as zero and sort last.
        let sorted = sort_transaction(&items(&['q', 'z', 'm']), &counts);
        assert_eq!(sorted, items(&['m', 'z', 'q']));
    }

    #[test]
    fn test_is_sorted() {
        let mut tree = FpTree::new();
        tree.insert(&items(&['a', 'b']), 2);
        tree.insert(&items(&['a']), 1);
        assert!(tree.is_sorted());

        // 'b' is now the most frequent item but sits below 'a'.
        tree.insert(&items(&['b']), 5);
        assert!(!tree.is_sorted());
    }
}
