//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::fmt;
use std::mem;

mod iter;
mod node;

pub use iter::{Entries, IntoIter, Iter, IterMut, Keys, Values};
pub use node::Balance;

use node::{Link, Node};

/// Number of columns each tree level is indented by in [`AvlTreeMap::render_structure`].
const INDENT_STEP: usize = 6;

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use avl_map::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
pub struct AvlTreeMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of levels of the tree, 0 for an empty map.
    pub fn height(&self) -> usize {
        Node::height(&self.root)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        Node::destroy(self.root.take());
        self.num_nodes = 0;
    }

    /// Moves all elements out of the map into a new one, leaving this map empty.
    ///
    /// ```
    /// use avl_map::AvlTreeMap;
    /// let mut a = AvlTreeMap::new();
    /// a.insert(1, "a");
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(b.get(&1), Some(&"a"));
    /// ```
    pub fn take(&mut self) -> Self {
        Self {
            root: self.root.take(),
            num_nodes: mem::replace(&mut self.num_nodes, 0),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::find(&self.root, key).map(|node| &node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::find(&self.root, key).map(|node| (&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::find_mut(&mut self.root, key).map(|node| &mut node.value)
    }

    /// Returns true if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::find(&self.root, key).is_some()
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Inserts a key-value pair into the map.
    /// If the key was already present, its value is replaced and the old value returned;
    /// the tree shape does not change in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let mut replaced = None;
        let (root, _) = Node::insert(self.root.take(), key, value, &mut replaced);
        self.root = Some(root);
        if replaced.is_none() {
            self.num_nodes += 1;
        }
        replaced
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.take()?;
        let mut removed = None;
        let (root, _) = Node::remove(root, key, &mut removed);
        self.root = root;
        if removed.is_some() {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        }
        removed
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.root, self.num_nodes)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Gets an iterator over the entries of the map together with the balance
    /// factor of the node holding them, sorted by key.
    ///
    /// ```
    /// use avl_map::AvlTreeMap;
    /// let map: AvlTreeMap<_, _> = (1..=3).map(|k| (k, k * 10)).collect();
    /// let entries: Vec<_> = map.entries().collect();
    /// assert_eq!(entries, [(&1, &10, 0), (&2, &20, 0), (&3, &30, 0)]);
    /// ```
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(&self.root, self.num_nodes)
    }

    /// Renders the shape of the tree, one node per line in pre-order.
    ///
    /// Each node shows its key and balance factor, indented by its depth.
    /// Missing children are shown as `*`. Meant for diagnostics only.
    ///
    /// ```
    /// use avl_map::AvlTreeMap;
    /// let map: AvlTreeMap<_, _> = [(2, ()), (1, ())].into_iter().collect();
    /// assert_eq!(
    ///     map.render_structure(),
    ///     "2 (-1)\n     1 (0)\n           *\n           *\n     *\n"
    /// );
    /// ```
    pub fn render_structure(&self) -> String
    where
        K: fmt::Display,
    {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_structure(&mut out);
        out
    }

    /// Writes the output of [`render_structure`](Self::render_structure) into `out`.
    pub fn write_structure<W: fmt::Write>(&self, out: &mut W) -> fmt::Result
    where
        K: fmt::Display,
    {
        write_structure_rec(out, &self.root, 0)
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        K: Ord,
    {
        // Returns the height of the subtree
        fn check_node<K: Ord, V>(link: &Link<K, V>, num_nodes: &mut usize) -> usize {
            let node = match link {
                None => return 0,
                Some(node) => node,
            };

            // Check order of child keys
            if let Some(left) = node.left.as_deref() {
                assert!(left.key < node.key);
            }
            if let Some(right) = node.right.as_deref() {
                assert!(right.key > node.key);
            }

            let left_height = check_node(&node.left, num_nodes);
            let right_height = check_node(&node.right, num_nodes);

            // Check stored balance against actual heights
            assert_eq!(
                i64::from(node.balance),
                right_height as i64 - left_height as i64
            );

            // Check AVL condition (nearly balance)
            assert!((-1..=1).contains(&node.balance));

            *num_nodes += 1;
            1 + left_height.max(right_height)
        }

        let mut num_nodes = 0;
        let height = check_node(&self.root, &mut num_nodes);

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);

        // Check cheap height against measured height
        assert_eq!(height, self.height());

        // Check global key order, which the parent-child check alone does not cover
        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert!(prev < key);
                prev = key;
            }
        }
    }
}

fn write_structure_rec<K, V, W>(out: &mut W, link: &Link<K, V>, indent: usize) -> fmt::Result
where
    K: fmt::Display,
    W: fmt::Write,
{
    match link {
        None => writeln!(out, "{:>indent$}", "*"),
        Some(node) => {
            writeln!(out, "{:>indent$} ({})", node.key, node.balance)?;
            write_structure_rec(out, &node.left, indent + INDENT_STEP)?;
            write_structure_rec(out, &node.right, indent + INDENT_STEP)
        }
    }
}

impl<K, V> Drop for AvlTreeMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for AvlTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: Node::deep_copy(&self.root),
            num_nodes: self.num_nodes,
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One `key : value (balance)` line per entry, sorted by key.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value, balance) in self.entries() {
            writeln!(f, "{} : {} ({})", key, value, balance)?;
        }
        Ok(())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = mem::replace(&mut self.num_nodes, 0);
        IntoIter::new(self.root.take(), len)
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut AvlTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
