//! Error types for tree construction and caller-supplied addresses.

use thiserror::Error;

/// Errors surfaced by the public tree API.
///
/// Internal hot loops never produce these; they are raised where caller
/// input enters the crate so a host can skip a frame instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CbtError {
  /// Requested max depth is outside what this tree variant supports.
  #[error("max depth {depth} is outside the supported range {min}..={max}")]
  InvalidDepth { depth: u32, min: u32, max: u32 },

  /// A bit access wider than one word pair can represent.
  #[error("bit access of width {width} exceeds the {max}-bit limit")]
  UnsupportedBitWidth { width: u32, max: u32 },

  /// A bit access that runs past the end of the backing storage.
  #[error("bit access [{bit_index}, +{width}) is outside a {capacity}-bit array")]
  BitIndexOutOfRange {
    bit_index: u64,
    width: u32,
    capacity: u64,
  },

  /// Node address does not exist in a tree of this max depth.
  #[error("node (heap index {heap_index}, depth {depth}) is not addressable at max depth {max_depth}")]
  InvalidNode {
    heap_index: u32,
    depth: u32,
    max_depth: u32,
  },

  /// Node exists but is not a current leaf.
  #[error("node (heap index {heap_index}, depth {depth}) is not a leaf")]
  NotALeaf { heap_index: u32, depth: u32 },

  /// Leaf index past the current leaf count.
  #[error("leaf index {index} is out of range for {leaf_count} leaves")]
  LeafIndexOutOfRange { index: u32, leaf_count: u32 },

  /// Replacement heap has the wrong number of words.
  #[error("heap buffer has {actual} words, expected {expected}")]
  HeapSizeMismatch { expected: usize, actual: usize },

  /// Replacement heap header encodes a different max depth.
  #[error("heap header encodes max depth {found}, expected {expected}")]
  HeapHeaderMismatch { expected: u32, found: u32 },
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, CbtError>;
