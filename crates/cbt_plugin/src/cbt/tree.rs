//! ConcurrentBinaryTree - the bit-packed production tree.
//!
//! Owns one [`PackedHeap`] for its whole lifetime. Mutations only touch
//! leaf markers; call [`ConcurrentBinaryTree::reduce`] after a batch of
//! splits/merges before reading leaf counts or translating leaf indices.

use super::heap::{check_max_depth, PackedHeap};
use super::reduction::{reduce_bit_parallel, reduce_naive};
use super::store::NodeStore;
use super::{ops, Node};
use crate::constants::{MAX_MAX_DEPTH, MIN_MAX_DEPTH};
use crate::error::{CbtError, Result};

/// Which sum-reduction strategy a tree runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReductionStrategy {
  /// One update per node per level.
  Naive,
  /// 32-marker word folds for the deepest five levels, naive above.
  #[default]
  BitParallel,
}

/// Bit-packed concurrent binary tree with a fixed max depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcurrentBinaryTree {
  heap: PackedHeap,
  strategy: ReductionStrategy,
}

impl ConcurrentBinaryTree {
  /// Create a tree whose only leaf is the root.
  pub fn new(max_depth: u32) -> Result<Self> {
    Self::with_initial_depth(max_depth, 0)
  }

  /// Create a tree whose leaves are all `2^depth` nodes at `depth`.
  pub fn with_initial_depth(max_depth: u32, depth: u32) -> Result<Self> {
    check_max_depth(max_depth, MIN_MAX_DEPTH, MAX_MAX_DEPTH)?;
    check_max_depth(depth, 0, max_depth)?;
    let mut tree = Self {
      heap: PackedHeap::new(max_depth),
      strategy: ReductionStrategy::default(),
    };
    for heap_index in (1u32 << depth)..(2u32 << depth) {
      let ceil = Node::new(heap_index, depth).ceil(max_depth);
      tree.heap.set_value(ceil, 1);
    }
    tree.reduce();
    #[cfg(feature = "tracing")]
    tracing::debug!(max_depth, depth, "created concurrent binary tree");
    Ok(tree)
  }

  /// Select the reduction strategy used by [`Self::reduce`].
  pub fn with_strategy(mut self, strategy: ReductionStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  /// Reduction strategy in use.
  #[inline]
  pub fn strategy(&self) -> ReductionStrategy {
    self.strategy
  }

  /// Max depth fixed at construction.
  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.heap.max_depth()
  }

  /// Leaf count as of the last reduction.
  #[inline]
  pub fn leaf_count(&self) -> u32 {
    ops::leaf_count(&self.heap)
  }

  /// Restore the sum invariant after split/merge edits.
  pub fn reduce(&mut self) {
    match self.strategy {
      ReductionStrategy::Naive => reduce_naive(&mut self.heap),
      ReductionStrategy::BitParallel => reduce_bit_parallel(&mut self.heap),
    }
  }

  /// Error unless `node` exists in this tree.
  pub fn check_node(&self, node: Node) -> Result<()> {
    let max_depth = self.max_depth();
    if node.is_valid(max_depth) {
      Ok(())
    } else {
      Err(CbtError::InvalidNode {
        heap_index: node.heap_index,
        depth: node.depth,
        max_depth,
      })
    }
  }

  /// Value field of a node (leaf count once reduced).
  pub fn value(&self, node: Node) -> Result<u32> {
    self.check_node(node)?;
    Ok(self.heap.value(node))
  }

  /// Post-reduction leaf test, with the left-descendant aliasing.
  pub fn is_leaf(&self, node: Node) -> Result<bool> {
    self.check_node(node)?;
    Ok(ops::is_leaf(&self.heap, node))
  }

  /// Mark `node`'s right child as a leaf (non-conforming).
  pub fn split_node(&mut self, node: Node) -> Result<()> {
    self.check_node(node)?;
    ops::split_node(&mut self.heap, node);
    Ok(())
  }

  /// Clear `node`'s right sibling marker (non-conforming).
  pub fn merge_node(&mut self, node: Node) -> Result<()> {
    self.check_node(node)?;
    ops::merge_node(&mut self.heap, node);
    Ok(())
  }

  /// Leaf at `leaf_index` in left-to-right order.
  pub fn leaf_index_to_node(&self, leaf_index: u32) -> Result<Node> {
    let leaf_count = self.leaf_count();
    if leaf_index >= leaf_count {
      return Err(CbtError::LeafIndexOutOfRange {
        index: leaf_index,
        leaf_count,
      });
    }
    Ok(ops::leaf_index_to_node(&self.heap, leaf_index))
  }

  /// Position of a leaf in left-to-right order.
  ///
  /// Internal nodes have no position and are rejected.
  pub fn node_to_leaf_index(&self, node: Node) -> Result<u32> {
    self.check_node(node)?;
    if !ops::is_leaf(&self.heap, node) {
      return Err(CbtError::NotALeaf {
        heap_index: node.heap_index,
        depth: node.depth,
      });
    }
    Ok(ops::node_to_leaf_index(&self.heap, node))
  }

  /// Iterate leaves in order (valid until the next mutation).
  pub fn leaves(&self) -> impl Iterator<Item = Node> + '_ {
    (0..self.leaf_count()).map(move |leaf_index| ops::leaf_index_to_node(&self.heap, leaf_index))
  }

  /// Value of every node, indexed by heap index (slot 0 unused).
  pub fn node_values(&self) -> Vec<u32> {
    let max_depth = self.max_depth();
    let mut values = vec![0; 2usize << max_depth];
    for depth in 0..=max_depth {
      for heap_index in (1u32 << depth)..(2u32 << depth) {
        values[heap_index as usize] = self.heap.value(Node::new(heap_index, depth));
      }
    }
    values
  }

  /// Raw packed words, header included.
  #[inline]
  pub fn heap(&self) -> &[u32] {
    self.heap.words()
  }

  /// Replace the packed words wholesale (test and debug harnesses).
  ///
  /// The buffer must match this tree's size and header. Counts are taken
  /// as given; reduce afterwards if only markers were edited.
  pub fn replace_heap(&mut self, words: Vec<u32>) -> Result<()> {
    self.heap = match PackedHeap::from_words(self.max_depth(), words) {
      Ok(heap) => heap,
      Err(err) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(%err, "rejected heap replacement");
        return Err(err);
      }
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(leaf_count = self.leaf_count(), "replaced heap");
    Ok(())
  }

  /// Packed storage, for the bisection and refinement layers.
  #[inline]
  pub fn store(&self) -> &PackedHeap {
    &self.heap
  }

  /// Mutable packed storage.
  #[inline]
  pub fn store_mut(&mut self) -> &mut PackedHeap {
    &mut self.heap
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
