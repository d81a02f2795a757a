//! Packed variable-width integer array over 32-bit words.
//!
//! The array owns the storage; callers only hold bit indices and widths.
//! A field of up to 32 bits may straddle two consecutive words, so every
//! access is routed through an [`AccessPlan`] that splits it into at most
//! two masked single-word chunks.

use crate::constants::{WORD_BITS, WORD_OFFSET_MASK, WORD_SHIFT};
use crate::error::{CbtError, Result};

/// How one field access maps onto the backing words.
///
/// `first_width + second_width` equals the requested width. When the field
/// fits in one word, `second_width` is 0 and `second_word` must not be
/// touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessPlan {
  /// Word holding the least significant bits of the field.
  pub first_word: usize,
  /// Bit offset of the field inside `first_word`.
  pub first_offset: u32,
  /// Number of field bits stored in `first_word`.
  pub first_width: u32,
  /// Word holding the remaining most significant bits.
  pub second_word: usize,
  /// Number of field bits stored at offset 0 of `second_word`.
  pub second_width: u32,
}

impl AccessPlan {
  /// Split an access of `width` bits starting at `bit_index`.
  #[inline]
  pub fn new(bit_index: u64, width: u32) -> Self {
    debug_assert!(width <= WORD_BITS, "field width {width} exceeds a word");
    let first_word = (bit_index >> WORD_SHIFT) as usize;
    let first_offset = (bit_index & WORD_OFFSET_MASK) as u32;
    let first_width = width.min(WORD_BITS - first_offset);
    Self {
      first_word,
      first_offset,
      first_width,
      second_word: first_word + 1,
      second_width: width - first_width,
    }
  }

  /// True when the field crosses a word boundary.
  #[inline]
  pub fn straddles(&self) -> bool {
    self.second_width > 0
  }
}

/// Mask with the low `width` bits set (`width` in 0..=32).
#[inline(always)]
pub const fn chunk_mask(width: u32) -> u32 {
  if width >= WORD_BITS {
    u32::MAX
  } else {
    (1u32 << width) - 1
  }
}

/// Read `width` bits at `offset` out of a single word.
#[inline(always)]
pub const fn read_chunk(word: u32, offset: u32, width: u32) -> u32 {
  (word >> offset) & chunk_mask(width)
}

/// Clear mask and positioned bits for writing `value` into a chunk.
///
/// Returned as `(mask, bits)`: the new word is `(word & !mask) | bits`.
/// The atomic heap applies the same pair with `fetch_and`/`fetch_or`.
#[inline(always)]
pub const fn chunk_bits(offset: u32, width: u32, value: u32) -> (u32, u32) {
  let mask = chunk_mask(width) << offset;
  (mask, (value << offset) & mask)
}

/// Overwrite `width` bits at `offset` inside a single word.
#[inline(always)]
pub const fn write_chunk(word: u32, offset: u32, width: u32, value: u32) -> u32 {
  let (mask, bits) = chunk_bits(offset, width, value);
  (word & !mask) | bits
}

/// Fixed-size array of 32-bit words with arbitrary-width field access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedBitArray {
  words: Vec<u32>,
}

impl PackedBitArray {
  /// Zeroed array of `word_count` words.
  pub fn new(word_count: usize) -> Self {
    Self {
      words: vec![0; word_count],
    }
  }

  /// Wrap existing words.
  pub fn from_words(words: Vec<u32>) -> Self {
    Self { words }
  }

  /// Backing words.
  #[inline]
  pub fn words(&self) -> &[u32] {
    &self.words
  }

  /// Mutable backing words.
  #[inline]
  pub fn words_mut(&mut self) -> &mut [u32] {
    &mut self.words
  }

  /// Give up the backing words.
  pub fn into_words(self) -> Vec<u32> {
    self.words
  }

  /// Number of backing words.
  #[inline]
  pub fn word_count(&self) -> usize {
    self.words.len()
  }

  /// Total number of addressable bits.
  #[inline]
  pub fn bit_capacity(&self) -> u64 {
    self.words.len() as u64 * u64::from(WORD_BITS)
  }

  /// Check that a field access is representable and in bounds.
  pub fn check_access(&self, bit_index: u64, width: u32) -> Result<()> {
    if width > WORD_BITS {
      return Err(CbtError::UnsupportedBitWidth {
        width,
        max: WORD_BITS,
      });
    }
    let capacity = self.bit_capacity();
    if bit_index
      .checked_add(u64::from(width))
      .map_or(true, |end| end > capacity)
    {
      return Err(CbtError::BitIndexOutOfRange {
        bit_index,
        width,
        capacity,
      });
    }
    Ok(())
  }

  /// Checked read of a `width`-bit field.
  pub fn get(&self, bit_index: u64, width: u32) -> Result<u32> {
    self.check_access(bit_index, width)?;
    Ok(self.read_bits(bit_index, width))
  }

  /// Checked write of a `width`-bit field. Bits of `value` above `width`
  /// are discarded.
  pub fn set(&mut self, bit_index: u64, width: u32, value: u32) -> Result<()> {
    self.check_access(bit_index, width)?;
    self.write_bits(bit_index, width, value & chunk_mask(width));
    Ok(())
  }

  /// Unchecked read; the caller guarantees the access is in bounds.
  #[inline]
  pub fn read_bits(&self, bit_index: u64, width: u32) -> u32 {
    let plan = AccessPlan::new(bit_index, width);
    let lsb = read_chunk(
      self.words[plan.first_word],
      plan.first_offset,
      plan.first_width,
    );
    if !plan.straddles() {
      return lsb;
    }
    let msb = read_chunk(self.words[plan.second_word], 0, plan.second_width);
    lsb | (msb << plan.first_width)
  }

  /// Unchecked write; the caller guarantees the access is in bounds.
  #[inline]
  pub fn write_bits(&mut self, bit_index: u64, width: u32, value: u32) {
    debug_assert!(
      value <= chunk_mask(width),
      "value {value} exceeds {width}-bit field"
    );
    let plan = AccessPlan::new(bit_index, width);
    let first = &mut self.words[plan.first_word];
    *first = write_chunk(*first, plan.first_offset, plan.first_width, value);
    if plan.straddles() {
      let second = &mut self.words[plan.second_word];
      *second = write_chunk(*second, 0, plan.second_width, value >> plan.first_width);
    }
  }
}

#[cfg(test)]
#[path = "bitfield_test.rs"]
mod bitfield_test;
