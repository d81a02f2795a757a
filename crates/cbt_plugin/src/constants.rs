//! Storage and scheduling constants shared by the packed tree, the
//! reduction engine and the data-parallel mirror.

/// Width of one heap word in bits.
pub const WORD_BITS: u32 = u32::BITS;

/// log2(WORD_BITS), used to turn bit indices into word indices.
pub const WORD_SHIFT: u32 = 5;

/// Mask extracting the bit offset inside a word from a bit index.
pub const WORD_OFFSET_MASK: u64 = (WORD_BITS as u64) - 1;

/// Number of deepest levels folded at once by the bit-parallel reduction
/// (one 32-bit word of leaf markers folds 2 -> 3 -> 4 -> 5 -> 6 bits).
pub const BIT_PARALLEL_LEVELS: u32 = 5;

/// Leaf markers consumed per bit-parallel fold.
pub const LEAF_MARKERS_PER_FOLD: u32 = 1 << BIT_PARALLEL_LEVELS;

/// Smallest max depth supported by the sequential packed tree.
pub const MIN_MAX_DEPTH: u32 = BIT_PARALLEL_LEVELS;

/// Largest max depth supported by the sequential packed tree.
pub const MAX_MAX_DEPTH: u32 = 29;

/// Smallest max depth supported by the data-parallel mirror.
pub const MIN_PARALLEL_MAX_DEPTH: u32 = 7;

/// Largest max depth supported by the data-parallel mirror.
///
/// The root field is `max_depth + 1` bits wide and every field must fit a
/// word pair, so 30 is the last depth whose root count fits in 31 bits.
pub const MAX_PARALLEL_MAX_DEPTH: u32 = 30;

/// Invocations per workgroup when deriving indirect dispatch sizes.
pub const WORKGROUP_SIZE: u32 = 256;

/// Bits of word 0 that hold the encoded max depth.
pub const HEADER_DEPTH_MASK: u32 = 0x1F;

/// Number of heap words needed for a tree of the given max depth.
///
/// The heap holds `2^(max_depth + 2)` bits.
#[inline]
pub const fn heap_word_count(max_depth: u32) -> usize {
  1usize << (max_depth + 2 - WORD_SHIFT)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
