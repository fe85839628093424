use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

/// Height of the right subtree minus height of the left subtree.
pub type Balance = i8;

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// Whether an insertion made the visited subtree one level taller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IsTaller(pub bool);

/// Whether a removal made the visited subtree one level shorter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IsShorter(pub bool);

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) balance: Balance,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            balance: 0,
            left: None,
            right: None,
        })
    }

    /// Frees a subtree, children before their parent.
    pub(crate) fn destroy(link: Link<K, V>) {
        if let Some(mut node) = link {
            Self::destroy(node.left.take());
            Self::destroy(node.right.take());
        }
    }

    pub(crate) fn deep_copy(link: &Link<K, V>) -> Link<K, V>
    where
        K: Clone,
        V: Clone,
    {
        link.as_ref().map(|node| {
            Box::new(Node {
                key: node.key.clone(),
                value: node.value.clone(),
                balance: node.balance,
                left: Self::deep_copy(&node.left),
                right: Self::deep_copy(&node.right),
            })
        })
    }

    /// Number of levels below and including the subtree root.
    /// Follows the taller child at every level, so this is O(log n).
    pub(crate) fn height(link: &Link<K, V>) -> usize {
        let mut height = 0;
        let mut current = link;
        while let Some(node) = current {
            height += 1;
            current = if node.balance > 0 {
                &node.right
            } else {
                &node.left
            };
        }
        height
    }

    pub(crate) fn find<'a, Q>(link: &'a Link<K, V>, key: &Q) -> Option<&'a Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = link.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            }
        }
        current
    }

    pub(crate) fn find_mut<'a, Q>(link: &'a mut Link<K, V>, key: &Q) -> Option<&'a mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = link.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Inserts or updates `key` in the subtree and returns the new subtree root.
    /// A replaced value is handed back through `replaced`.
    pub(crate) fn insert(
        link: Link<K, V>,
        key: K,
        value: V,
        replaced: &mut Option<V>,
    ) -> (Box<Self>, IsTaller) {
        let mut node = match link {
            None => return (Self::create(key, value), IsTaller(true)),
            Some(node) => node,
        };

        let grew = match key.cmp(&node.key) {
            Ordering::Equal => {
                *replaced = Some(mem::replace(&mut node.value, value));
                return (node, IsTaller(false));
            }
            Ordering::Less => {
                let (left, grew) = Self::insert(node.left.take(), key, value, replaced);
                node.left = Some(left);
                if grew.0 {
                    node.balance -= 1;
                }
                grew.0
            }
            Ordering::Greater => {
                let (right, grew) = Self::insert(node.right.take(), key, value, replaced);
                node.right = Some(right);
                if grew.0 {
                    node.balance += 1;
                }
                grew.0
            }
        };

        match node.balance {
            // Growth absorbed by the shorter side
            0 => (node, IsTaller(false)),
            -1 | 1 => (node, IsTaller(grew)),
            _ => {
                let (node, height_changed) = Self::rebalance(node);
                (node, IsTaller(grew && !height_changed))
            }
        }
    }
}

impl<K, V> Node<K, V> {
    /// Removes `key` from the subtree and returns the new subtree root.
    /// The removed entry is handed back through `removed`.
    pub(crate) fn remove<Q>(
        mut node: Box<Self>,
        key: &Q,
        removed: &mut Option<(K, V)>,
    ) -> (Link<K, V>, IsShorter)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let left = match node.left.take() {
                    None => return (Some(node), IsShorter(false)),
                    Some(left) => left,
                };
                let (left, shrank) = Self::remove(left, key, removed);
                node.left = left;
                if !shrank.0 {
                    return (Some(node), IsShorter(false));
                }
                node.balance += 1;
                let (node, shrank) = Self::settle_shrink(node);
                (Some(node), shrank)
            }
            Ordering::Greater => {
                let right = match node.right.take() {
                    None => return (Some(node), IsShorter(false)),
                    Some(right) => right,
                };
                let (right, shrank) = Self::remove(right, key, removed);
                node.right = right;
                if !shrank.0 {
                    return (Some(node), IsShorter(false));
                }
                node.balance -= 1;
                let (node, shrank) = Self::settle_shrink(node);
                (Some(node), shrank)
            }
            Ordering::Equal => {
                let Node {
                    key,
                    value,
                    balance,
                    left,
                    right,
                } = *node;
                *removed = Some((key, value));

                match (left, right) {
                    (None, None) => (None, IsShorter(true)),
                    // The surviving child already carries its own balance.
                    (Some(child), None) | (None, Some(child)) => (Some(child), IsShorter(true)),
                    (Some(left), Some(right)) => {
                        let (right, mut successor, shrank) = Self::detach_min(right);
                        successor.left = Some(left);
                        successor.right = right;
                        successor.balance = balance;
                        if !shrank.0 {
                            return (Some(successor), IsShorter(false));
                        }
                        successor.balance -= 1;
                        let (successor, shrank) = Self::settle_shrink(successor);
                        (Some(successor), shrank)
                    }
                }
            }
        }
    }

    /// Unlinks the leftmost node of the subtree.
    /// Returns the remaining subtree, the detached node, and whether the
    /// remaining subtree is shorter than before. The detached node keeps stale
    /// child links and balance; the caller overwrites them.
    pub(crate) fn detach_min(mut node: Box<Self>) -> (Link<K, V>, Box<Self>, IsShorter) {
        match node.left.take() {
            None => {
                let right = node.right.take();
                (right, node, IsShorter(true))
            }
            Some(left) => {
                let (left, min, shrank) = Self::detach_min(left);
                node.left = left;
                if !shrank.0 {
                    return (Some(node), min, IsShorter(false));
                }
                node.balance += 1;
                let (node, shrank) = Self::settle_shrink(node);
                (Some(node), min, shrank)
            }
        }
    }

    /// Finishes a removal step after one child shrank and the balance was adjusted.
    fn settle_shrink(node: Box<Self>) -> (Box<Self>, IsShorter) {
        match node.balance {
            0 => (node, IsShorter(true)),
            // The taller side is untouched, so is the subtree height.
            -1 | 1 => (node, IsShorter(false)),
            _ => {
                let (node, height_changed) = Self::rebalance(node);
                (node, IsShorter(height_changed))
            }
        }
    }

    /// Restores the AVL condition at a node whose balance is +2 or -2.
    /// Returns the new subtree root and whether the rotation changed the
    /// subtree height compared to before the rotation.
    pub(crate) fn rebalance(mut node: Box<Self>) -> (Box<Self>, bool) {
        debug_assert!(node.balance == 2 || node.balance == -2);

        if node.balance > 0 {
            let right = node
                .right
                .take()
                .expect("right-heavy node must have a right child");
            match right.balance {
                1 => {
                    node.right = Some(right);
                    (Self::rotate_left(node), true)
                }
                // Only reachable while removing.
                0 => {
                    node.right = Some(right);
                    (Self::rotate_left(node), false)
                }
                _ => {
                    node.right = Some(Self::rotate_right(right));
                    (Self::rotate_left(node), true)
                }
            }
        } else {
            let left = node
                .left
                .take()
                .expect("left-heavy node must have a left child");
            match left.balance {
                -1 => {
                    node.left = Some(left);
                    (Self::rotate_right(node), true)
                }
                // Only reachable while removing.
                0 => {
                    node.left = Some(left);
                    (Self::rotate_right(node), false)
                }
                _ => {
                    node.left = Some(Self::rotate_left(left));
                    (Self::rotate_right(node), true)
                }
            }
        }
    }

    //   a            b
    //  / \          / \
    // x   b   ->   a   z
    //    / \      / \
    //   y   z    x   y
    fn rotate_left(mut node: Box<Self>) -> Box<Self> {
        let mut pivot = node
            .right
            .take()
            .expect("rotate_left requires a right child");
        node.right = pivot.left.take();

        node.balance = node.balance - 1 - cmp::max(pivot.balance, 0);
        pivot.balance = pivot.balance - 1 - cmp::max(-node.balance, 0);

        pivot.left = Some(node);
        pivot
    }

    //     a        b
    //    / \      / \
    //   b   z -> x   a
    //  / \          / \
    // x   y        y   z
    fn rotate_right(mut node: Box<Self>) -> Box<Self> {
        let mut pivot = node
            .left
            .take()
            .expect("rotate_right requires a left child");
        node.left = pivot.right.take();

        node.balance = node.balance + 1 + cmp::max(-pivot.balance, 0);
        pivot.balance = pivot.balance + 1 + cmp::max(node.balance, 0);

        pivot.right = Some(node);
        pivot
    }
}
