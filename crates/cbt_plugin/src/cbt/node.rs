//! Node - immutable address of a node in the implicit binary tree.
//!
//! Nodes are identified by their heap index and depth. The root is
//! `{1, 0}`; the children of `{i, d}` are `{2i, d+1}` and `{2i+1, d+1}`.
//! The heap index bits below the leading one spell the path from the root,
//! most significant bit first (0 = left, 1 = right).

/// Binary tree node address - immutable value type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Node {
  /// Heap index (1 = root, 0 = null).
  pub heap_index: u32,
  /// Depth below the root.
  pub depth: u32,
}

impl Node {
  /// The root node.
  pub const ROOT: Self = Self {
    heap_index: 1,
    depth: 0,
  };

  /// The null node: "no such node" or "outside the domain".
  pub const NULL: Self = Self {
    heap_index: 0,
    depth: 0,
  };

  /// Create a node at the given heap index and depth.
  #[inline]
  pub const fn new(heap_index: u32, depth: u32) -> Self {
    Self { heap_index, depth }
  }

  /// True for the null node id.
  #[inline]
  pub const fn is_null(&self) -> bool {
    self.heap_index == 0
  }

  /// True for the root.
  #[inline]
  pub const fn is_root(&self) -> bool {
    self.heap_index == 1
  }

  /// True when the heap index actually lives at this depth.
  #[inline]
  pub const fn is_well_formed(&self) -> bool {
    self.depth < u32::BITS - 1 && (self.heap_index >> self.depth) == 1
  }

  /// True when the node is addressable in a tree of `max_depth`.
  #[inline]
  pub const fn is_valid(&self, max_depth: u32) -> bool {
    self.depth <= max_depth && self.is_well_formed()
  }

  /// Parent node. The root's parent is [`Node::NULL`].
  #[inline]
  pub const fn parent(&self) -> Self {
    if self.depth == 0 {
      return Self::NULL;
    }
    Self::new(self.heap_index >> 1, self.depth - 1)
  }

  /// Left child (finer by one level).
  #[inline]
  pub const fn left_child(&self) -> Self {
    Self::new(self.heap_index << 1, self.depth + 1)
  }

  /// Right child (finer by one level).
  #[inline]
  pub const fn right_child(&self) -> Self {
    Self::new((self.heap_index << 1) | 1, self.depth + 1)
  }

  /// Child selected by a path bit (0 = left, 1 = right).
  #[inline]
  pub const fn child(&self, bit: u32) -> Self {
    Self::new((self.heap_index << 1) | (bit & 1), self.depth + 1)
  }

  /// The other child of this node's parent.
  #[inline]
  pub const fn sibling(&self) -> Self {
    Self::new(self.heap_index ^ 1, self.depth)
  }

  /// The right child of this node's parent (self when already right).
  #[inline]
  pub const fn right_sibling(&self) -> Self {
    Self::new(self.heap_index | 1, self.depth)
  }

  /// True when this node is its parent's right child.
  #[inline]
  pub const fn is_right_child(&self) -> bool {
    self.heap_index & 1 == 1 && self.depth > 0
  }

  /// Leftmost descendant at `max_depth`.
  ///
  /// A node and every left descendant share the same ceil node, which is
  /// where their leaf marker lives.
  #[inline]
  pub const fn ceil(&self, max_depth: u32) -> Self {
    Self::new(self.heap_index << (max_depth - self.depth), max_depth)
  }

  /// Path bit taken at `level` (1 = first step below the root).
  #[inline]
  pub const fn path_bit(&self, level: u32) -> u32 {
    (self.heap_index >> (self.depth - level)) & 1
  }

  /// Path bits from the root down, most significant first.
  pub fn path_bits(&self) -> impl Iterator<Item = u32> {
    let heap_index = self.heap_index;
    (0..self.depth).rev().map(move |shift| (heap_index >> shift) & 1)
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
