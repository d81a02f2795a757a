//! Conforming longest-edge bisection on top of the raw leaf operations.
//!
//! A conforming split walks the chain of hypotenuse neighbours and splits
//! whatever is needed so no T-junction appears. A conforming merge only
//! fires when both triangles of the diamond can collapse together.
//! Neither reduces; run a reduction before trusting counts again.

use super::neighbourhood::{edge_neighbour, WindingConvention};
use crate::cbt::{ops, Node, NodeStore};

/// The two triangles that form a node's diamond.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiamondParent {
  /// The node's parent.
  pub base: Node,
  /// The parent's hypotenuse neighbour, or `base` on the boundary.
  pub top: Node,
}

/// Diamond of `node` (the root has no diamond; both halves are NULL).
#[inline]
pub fn decode_diamond_parent(node: Node, winding: WindingConvention) -> DiamondParent {
  let base = node.parent();
  if base.is_null() {
    return DiamondParent {
      base,
      top: Node::NULL,
    };
  }
  let edge = edge_neighbour(base, winding);
  DiamondParent {
    base,
    top: if edge.is_null() { base } else { edge },
  }
}

/// Split `node` and every triangle needed to keep the mesh conforming.
///
/// No-op at max depth. Each step of the walk moves one level up, so it
/// ends after at most `depth` iterations.
pub fn split_node_conforming<S: NodeStore>(store: &mut S, node: Node, winding: WindingConvention) {
  if node.depth >= store.max_depth() {
    return;
  }
  ops::split_node(store, node);
  let mut iter = edge_neighbour(node, winding);
  while iter.heap_index > 1 {
    ops::split_node(store, iter);
    iter = iter.parent();
    ops::split_node(store, iter);
    iter = edge_neighbour(iter, winding);
  }
}

/// Collapse `node`'s diamond when both halves hold exactly two leaves.
///
/// Returns whether markers were cleared. Leaves the heap untouched when
/// the diamond does not qualify. Reads post-reduction values.
pub fn merge_node_conforming<S: NodeStore>(store: &mut S, node: Node, winding: WindingConvention) -> bool {
  if node.heap_index <= 1 {
    return false;
  }
  let diamond = decode_diamond_parent(node, winding);
  if store.value(diamond.base) <= 2 && store.value(diamond.top) <= 2 {
    ops::merge_node(store, node);
    ops::merge_node(store, diamond.top.right_child());
    true
  } else {
    false
  }
}

#[cfg(test)]
#[path = "bisection_test.rs"]
mod bisection_test;
