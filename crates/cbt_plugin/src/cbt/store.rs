//! Node addressing: where each node's value field lives in the packed heap.
//!
//! Depth `d` of a tree with max depth `D` stores `2^d` fields of
//! `D - d + 1` bits each, starting at bit `2^(d+1)`. Levels are laid out
//! back to back, so the whole heap spans `2^(D+2)` bits and the deepest
//! level is a plain bitfield of leaf markers.

use super::Node;

/// Width in bits of a node's value field at `depth`.
///
/// A subtree rooted at depth `d` has at most `2^(D-d)` leaves, which needs
/// exactly `D - d + 1` bits.
#[inline(always)]
pub const fn field_width(depth: u32, max_depth: u32) -> u32 {
  max_depth - depth + 1
}

/// Bit offset of a node's value field.
#[inline(always)]
pub const fn bit_index_of(node: Node, max_depth: u32) -> u64 {
  (2u64 << node.depth) + node.heap_index as u64 * field_width(node.depth, max_depth) as u64
}

/// Per-node value storage the tree algorithms run against.
///
/// Implemented by the packed heap, by shared references to the atomic heap
/// of the data-parallel mirror, and by the one-word-per-node test oracle.
pub trait NodeStore {
  /// Max depth the store was allocated for.
  fn max_depth(&self) -> u32;

  /// Value field of `node`: a leaf marker at max depth, a leaf count above
  /// it once reduced.
  fn value(&self, node: Node) -> u32;

  /// Overwrite the value field of `node`.
  fn set_value(&mut self, node: Node, value: u32);
}

/// Stores backed by packed words, which additionally allow fields of an
/// explicit width anchored at a node's bit offset.
///
/// The bit-parallel reduction uses this to read 32 leaf markers at once and
/// write several folded sums with one access.
pub trait PackedStore: NodeStore {
  /// Read `width` bits starting at `node`'s field.
  fn read_explicit(&self, node: Node, width: u32) -> u32;

  /// Write `width` bits starting at `node`'s field.
  fn write_explicit(&mut self, node: Node, width: u32, value: u32);
}
