//! An ordered map implemented with an AVL tree.
//!
//! Every node stores its balance factor (right subtree height minus left
//! subtree height) instead of its height. Insertions and removals walk down
//! from the root and report back up whether the visited subtree grew or
//! shrank, which is all the information needed to update the balance
//! factors on the search path and to decide where a rotation is due.
//!
//! ```
//! use avl_map::AvlTreeMap;
//!
//! let mut map = AvlTreeMap::new();
//! map.insert(5, "e");
//! map.insert(3, "c");
//! map.insert(8, "h");
//! assert_eq!(map.get(&3), Some(&"c"));
//!
//! map.remove(&3);
//! assert!(map.get(&3).is_none());
//!
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, [5, 8]);
//! ```

pub mod map;

pub use map::{AvlTreeMap, Balance};
