//! PackedHeap - the bit-packed value storage of one tree instance.
//!
//! Word 0 carries the max depth in its low bits; every node then owns a
//! field addressed by [`bit_index_of`]. The heap is allocated once with a
//! fixed max depth and never grows.

use super::store::{bit_index_of, field_width, NodeStore, PackedStore};
use super::Node;
use crate::bitfield::PackedBitArray;
use crate::constants::{heap_word_count, HEADER_DEPTH_MASK};
use crate::error::{CbtError, Result};

/// Check a max depth against a supported range.
pub fn check_max_depth(depth: u32, min: u32, max: u32) -> Result<()> {
  if depth < min || depth > max {
    return Err(CbtError::InvalidDepth { depth, min, max });
  }
  Ok(())
}

/// Max depth stored in a heap header word.
#[inline]
pub const fn decode_header(word: u32) -> u32 {
  word & HEADER_DEPTH_MASK
}

/// Bit-packed node values of a tree with a fixed max depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedHeap {
  bits: PackedBitArray,
  max_depth: u32,
}

impl PackedHeap {
  /// Allocate a zeroed heap with its header written.
  ///
  /// The depth range is checked by the owning tree.
  pub fn new(max_depth: u32) -> Self {
    debug_assert!(max_depth <= HEADER_DEPTH_MASK);
    let mut bits = PackedBitArray::new(heap_word_count(max_depth));
    bits.words_mut()[0] = max_depth;
    Self { bits, max_depth }
  }

  /// Adopt raw words after checking their length and header.
  pub fn from_words(max_depth: u32, words: Vec<u32>) -> Result<Self> {
    check_heap_words(max_depth, &words)?;
    Ok(Self {
      bits: PackedBitArray::from_words(words),
      max_depth,
    })
  }

  /// Raw words, header included.
  #[inline]
  pub fn words(&self) -> &[u32] {
    self.bits.words()
  }

  /// Give up the raw words.
  pub fn into_words(self) -> Vec<u32> {
    self.bits.into_words()
  }

  /// Underlying bit array.
  #[inline]
  pub fn bits(&self) -> &PackedBitArray {
    &self.bits
  }
}

/// Validate a raw heap buffer for a tree of `max_depth`.
pub fn check_heap_words(max_depth: u32, words: &[u32]) -> Result<()> {
  let expected = heap_word_count(max_depth);
  if words.len() != expected {
    return Err(CbtError::HeapSizeMismatch {
      expected,
      actual: words.len(),
    });
  }
  let found = decode_header(words[0]);
  if found != max_depth {
    return Err(CbtError::HeapHeaderMismatch {
      expected: max_depth,
      found,
    });
  }
  Ok(())
}

impl NodeStore for PackedHeap {
  #[inline]
  fn max_depth(&self) -> u32 {
    self.max_depth
  }

  #[inline]
  fn value(&self, node: Node) -> u32 {
    self.read_explicit(node, field_width(node.depth, self.max_depth))
  }

  #[inline]
  fn set_value(&mut self, node: Node, value: u32) {
    let width = field_width(node.depth, self.max_depth);
    self.write_explicit(node, width, value);
  }
}

impl PackedStore for PackedHeap {
  #[inline]
  fn read_explicit(&self, node: Node, width: u32) -> u32 {
    self.bits.read_bits(bit_index_of(node, self.max_depth), width)
  }

  #[inline]
  fn write_explicit(&mut self, node: Node, width: u32, value: u32) {
    self.bits.write_bits(bit_index_of(node, self.max_depth), width, value);
  }
}

#[cfg(test)]
#[path = "heap_test.rs"]
mod heap_test;
