use crate::fptree::FpTree;
use crate::item::Item;
use slotmap::DefaultKey;
use std::hash::Hash;

/// Iterator over the distinct transactions stored in an [`FpTree`].
///
/// Yields `(path, count)` where `count` is the number of transactions that
/// end exactly at the last node of `path`. Walks the tree depth-first with
/// an explicit stack; the order between siblings is unspecified.
pub struct PathIter<'a, T> {
    tree: &'a FpTree<T>,
    stack: Vec<DefaultKey>,
}

impl<'a, T: Hash + Eq + Ord + Clone> PathIter<'a, T> {
    pub(crate) fn new(tree: &'a FpTree<T>) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }

    /// Rebuilds the root-to-node path by following parent links.
    fn path_to(&self, key: DefaultKey) -> Vec<Item<T>> {
        let mut path = Vec::new();
        let mut current = Some(key);
        while let Some(k) = current {
            let node = &self.tree.nodes[k];
            if let Some(item) = &node.item {
                path.push(item.clone());
            }
            current = node.parent;
        }
        path.reverse();
        path
    }
}

impl<'a, T: Hash + Eq + Ord + Clone> Iterator for PathIter<'a, T> {
    type Item = (Vec<Item<T>>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(key) = self.stack.pop() {
            let node = &self.tree.nodes[key];

            let mut passing = 0;
            for &child in node.children.values() {
                passing += self.tree.nodes[child].count;
                self.stack.push(child);
            }

            let ending = node.count - passing;
            if ending > 0 {
                return Some((self.path_to(key), ending));
            }
        }
        None
    }
}

impl<T: Hash + Eq + Ord + Clone> FpTree<T> {
    /// Returns an iterator over the stored `(path, count)` pairs.
    pub fn iter(&self) -> PathIter<'_, T> {
        PathIter::new(self)
    }
}

impl<'a, T: Hash + Eq + Ord + Clone> IntoIterator for &'a FpTree<T> {
    type Item = (Vec<Item<T>>, usize);
    type IntoIter = PathIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
