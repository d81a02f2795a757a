//! Sum reduction: bottom-up leaf counts for every internal node.
//!
//! Level `d` depends on level `d + 1` being fully written, so both
//! strategies process one depth at a time from `max_depth - 1` up to the
//! root.
//!
//! # Strategies
//!
//! - **Naive**: one `value = left + right` update per node per level.
//! - **Bit-parallel**: the deepest level is a bitfield, so 32 leaf markers
//!   form one word. Pairwise add-and-shift folds that word into 2-, 3-, 4-,
//!   5- and 6-bit partial sums, which are exactly the fields of the next
//!   five levels up. Those are written directly, then the naive loop
//!   finishes the remaining coarser levels.
//!
//! Both produce bit-identical heaps.

use super::store::{NodeStore, PackedStore};
use super::Node;
use crate::constants::{BIT_PARALLEL_LEVELS, LEAF_MARKERS_PER_FOLD};

/// Widths of the fields written by one fold, from `max_depth - 1` upward.
///
/// 16 fields of 2 bits, 8 of 3, 4 of 4, 2 of 5 and 1 of 6.
pub const FOLD_WIDTHS: [u32; BIT_PARALLEL_LEVELS as usize] = [32, 24, 16, 10, 6];

/// Recompute one internal node from its two children.
#[inline]
pub fn reduce_node<S: NodeStore>(store: &mut S, node: Node) {
  let sum = store.value(node.left_child()) + store.value(node.right_child());
  store.set_value(node, sum);
}

/// Recompute every node at `depth` from the level below.
pub fn reduce_level<S: NodeStore>(store: &mut S, depth: u32) {
  for heap_index in (1u32 << depth)..(2u32 << depth) {
    reduce_node(store, Node::new(heap_index, depth));
  }
}

/// Naive reduction over every level.
pub fn reduce_naive<S: NodeStore>(store: &mut S) {
  let max_depth = store.max_depth();
  for depth in (0..max_depth).rev() {
    reduce_level(store, depth);
  }
}

/// Fold 32 leaf markers into the packed fields of the five levels above.
///
/// Entry `k` holds the fields of depth `max_depth - 1 - k`, packed exactly as
/// they are laid out in the heap (see [`FOLD_WIDTHS`]).
#[inline]
pub const fn fold_leaf_word(markers: u32) -> [u32; BIT_PARALLEL_LEVELS as usize] {
  // 2-bit lanes: sums of marker pairs.
  let mut bits = (markers & 0x5555_5555) + ((markers >> 1) & 0x5555_5555);
  let pairs = bits;

  // 4-bit lanes holding 3-bit sums; squeeze lane j from bit 4j to bit 3j.
  bits = (bits & 0x3333_3333) + ((bits >> 2) & 0x3333_3333);
  let mut triples = 0;
  let mut lane = 0;
  while lane < 8 {
    triples |= (bits >> lane) & (0x7 << (3 * lane));
    lane += 1;
  }

  // 8-bit lanes holding 4-bit sums; lane k moves from 8k to 4k.
  bits = (bits & 0x0F0F_0F0F) + ((bits >> 4) & 0x0F0F_0F0F);
  let mut quads = 0;
  lane = 0;
  while lane < 4 {
    quads |= (bits >> (4 * lane)) & (0xF << (4 * lane));
    lane += 1;
  }

  // 16-bit lanes holding 5-bit sums; lane 1 moves from 16 to 5.
  bits = (bits & 0x00FF_00FF) + ((bits >> 8) & 0x00FF_00FF);
  let quints = (bits & 0x1F) | ((bits >> 11) & (0x1F << 5));

  // Single 6-bit total.
  let total = (bits & 0xFFFF) + (bits >> 16);

  [pairs, triples, quads, quints, total]
}

/// Bit-parallel prepass for the 32 deepest nodes starting at `first_leaf`.
///
/// `first_leaf` is a heap index at `max_depth`, aligned to 32. One call
/// reads one word and writes the five coarser fields it feeds; calls for
/// different words touch disjoint fields.
#[inline]
pub fn reduce_prepass_word<S: PackedStore>(store: &mut S, first_leaf: u32) {
  let max_depth = store.max_depth();
  debug_assert!(first_leaf % LEAF_MARKERS_PER_FOLD == 0);
  let markers = store.read_explicit(Node::new(first_leaf, max_depth), LEAF_MARKERS_PER_FOLD);
  let folded = fold_leaf_word(markers);
  for (level, (&width, &bits)) in FOLD_WIDTHS.iter().zip(folded.iter()).enumerate() {
    let shift = level as u32 + 1;
    store.write_explicit(Node::new(first_leaf >> shift, max_depth - shift), width, bits);
  }
}

/// Number of prepass words for a tree of `max_depth`.
#[inline]
pub const fn prepass_word_count(max_depth: u32) -> u32 {
  (1u32 << max_depth) / LEAF_MARKERS_PER_FOLD
}

/// Bit-parallel reduction: prepass for the deepest five levels, naive for
/// the rest.
pub fn reduce_bit_parallel<S: PackedStore>(store: &mut S) {
  let max_depth = store.max_depth();
  debug_assert!(max_depth >= BIT_PARALLEL_LEVELS);
  let first_leaf = 1u32 << max_depth;
  for word in 0..prepass_word_count(max_depth) {
    reduce_prepass_word(store, first_leaf + word * LEAF_MARKERS_PER_FOLD);
  }
  for depth in (0..max_depth - BIT_PARALLEL_LEVELS).rev() {
    reduce_level(store, depth);
  }
}

#[cfg(test)]
#[path = "reduction_test.rs"]
mod reduction_test;
