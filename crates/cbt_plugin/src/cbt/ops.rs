//! Leaf-level tree operations on any [`NodeStore`].
//!
//! Leaves are marked in the deepest level at their ceil node. A node and
//! its left child share that slot, so a marker of 1 means "this node or one
//! of its left descendants is a leaf". Split and merge only ever touch
//! markers; counts above the deepest level are stale until the next
//! reduction.

use super::store::NodeStore;
use super::Node;

/// Total number of leaves (post-reduction root value).
#[inline]
pub fn leaf_count<S: NodeStore>(store: &S) -> u32 {
  store.value(Node::ROOT)
}

/// Post-reduction leaf test.
///
/// Inherits the marker aliasing: a left descendant of a leaf also reads as
/// a leaf.
#[inline]
pub fn is_leaf<S: NodeStore>(store: &S, node: Node) -> bool {
  store.value(node) == 1
}

/// Mark the right child of `node` as a leaf. No-op at max depth.
///
/// The left child inherits `node`'s marker, so after the next reduction
/// both children are leaves. Used alone this may break conformity.
#[inline]
pub fn split_node<S: NodeStore>(store: &mut S, node: Node) {
  let max_depth = store.max_depth();
  if node.depth < max_depth {
    store.set_value(node.right_child().ceil(max_depth), 1);
  }
}

/// Clear the marker of `node`'s right sibling. No-op for the root.
///
/// After the next reduction the parent reads as a single leaf again.
#[inline]
pub fn merge_node<S: NodeStore>(store: &mut S, node: Node) {
  let max_depth = store.max_depth();
  if node.depth > 0 {
    store.set_value(node.right_sibling().ceil(max_depth), 0);
  }
}

/// Map a leaf index in `[0, leaf_count)` to its node.
///
/// Descends from the root using post-reduction counts: go left while the
/// index is below the left subtree's count, otherwise subtract it and go
/// right. O(max_depth).
#[inline]
pub fn leaf_index_to_node<S: NodeStore>(store: &S, leaf_index: u32) -> Node {
  let mut node = Node::ROOT;
  let mut remaining = leaf_index;
  while store.value(node) > 1 {
    let left = node.left_child();
    let left_count = store.value(left);
    if remaining < left_count {
      node = left;
    } else {
      remaining -= left_count;
      node = node.right_child();
    }
  }
  node
}

/// Inverse of [`leaf_index_to_node`] for a leaf node.
///
/// Every right step on the path skips the whole left sibling subtree.
#[inline]
pub fn node_to_leaf_index<S: NodeStore>(store: &S, node: Node) -> u32 {
  let mut leaf_index = 0;
  let mut current = node;
  while current.depth > 0 {
    if current.is_right_child() {
      leaf_index += store.value(current.sibling());
    }
    current = current.parent();
  }
  leaf_index
}

#[cfg(test)]
#[path = "ops_test.rs"]
mod ops_test;
