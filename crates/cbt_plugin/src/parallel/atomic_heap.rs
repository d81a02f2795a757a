//! AtomicHeap - packed heap shared by concurrent kernel invocations.
//!
//! Same layout as [`PackedHeap`](crate::cbt::PackedHeap), stored as
//! `AtomicU32` words. Field writes are masked `fetch_or` then `fetch_and`,
//! so each bit moves from its old to its new value exactly once and
//! concurrent writers of disjoint fields sharing a word never clobber each
//! other. Shared references implement the store traits, which lets every
//! generic tree routine run unchanged inside a kernel.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::bitfield::{chunk_bits, read_chunk, AccessPlan};
use crate::cbt::heap::{check_heap_words, check_max_depth};
use crate::cbt::{bit_index_of, field_width, Node, NodeStore, PackedStore};
use crate::constants::{heap_word_count, MAX_PARALLEL_MAX_DEPTH, MIN_PARALLEL_MAX_DEPTH};
use crate::error::Result;

/// Packed heap with atomic words.
#[derive(Debug)]
pub struct AtomicHeap {
  words: Vec<AtomicU32>,
  max_depth: u32,
}

impl AtomicHeap {
  /// Zeroed heap with only the header written.
  pub fn new(max_depth: u32) -> Result<Self> {
    check_max_depth(max_depth, MIN_PARALLEL_MAX_DEPTH, MAX_PARALLEL_MAX_DEPTH)?;
    let words: Vec<AtomicU32> = (0..heap_word_count(max_depth)).map(|_| AtomicU32::new(0)).collect();
    words[0].store(max_depth, Ordering::Relaxed);
    Ok(Self { words, max_depth })
  }

  /// Heap initialised from plain words (size and header checked).
  pub fn from_words(max_depth: u32, words: &[u32]) -> Result<Self> {
    check_max_depth(max_depth, MIN_PARALLEL_MAX_DEPTH, MAX_PARALLEL_MAX_DEPTH)?;
    check_heap_words(max_depth, words)?;
    Ok(Self {
      words: words.iter().map(|&word| AtomicU32::new(word)).collect(),
      max_depth,
    })
  }

  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.max_depth
  }

  #[inline]
  pub fn word_count(&self) -> usize {
    self.words.len()
  }

  /// Copy of the words. Only meaningful after a barrier.
  pub fn snapshot(&self) -> Vec<u32> {
    self.words.iter().map(|word| word.load(Ordering::Relaxed)).collect()
  }

  /// Overwrite every word (size and header checked).
  pub fn upload(&mut self, words: &[u32]) -> Result<()> {
    check_heap_words(self.max_depth, words)?;
    for (dst, &src) in self.words.iter_mut().zip(words) {
      *dst.get_mut() = src;
    }
    Ok(())
  }

  #[inline]
  fn read_bits(&self, bit_index: u64, width: u32) -> u32 {
    let plan = AccessPlan::new(bit_index, width);
    let first = self.words[plan.first_word].load(Ordering::Relaxed);
    let lsb = read_chunk(first, plan.first_offset, plan.first_width);
    if !plan.straddles() {
      return lsb;
    }
    let second = self.words[plan.second_word].load(Ordering::Relaxed);
    lsb | (read_chunk(second, 0, plan.second_width) << plan.first_width)
  }

  #[inline]
  fn write_chunk(&self, word: usize, offset: u32, width: u32, value: u32) {
    let (mask, bits) = chunk_bits(offset, width, value);
    let word = &self.words[word];
    word.fetch_or(bits, Ordering::Relaxed);
    word.fetch_and(!mask | bits, Ordering::Relaxed);
  }

  #[inline]
  fn write_bits(&self, bit_index: u64, width: u32, value: u32) {
    let plan = AccessPlan::new(bit_index, width);
    self.write_chunk(plan.first_word, plan.first_offset, plan.first_width, value);
    if plan.straddles() {
      self.write_chunk(plan.second_word, 0, plan.second_width, value >> plan.first_width);
    }
  }
}

impl NodeStore for &AtomicHeap {
  #[inline]
  fn max_depth(&self) -> u32 {
    self.max_depth
  }

  #[inline]
  fn value(&self, node: Node) -> u32 {
    self.read_bits(bit_index_of(node, self.max_depth), field_width(node.depth, self.max_depth))
  }

  #[inline]
  fn set_value(&mut self, node: Node, value: u32) {
    self.write_bits(bit_index_of(node, self.max_depth), field_width(node.depth, self.max_depth), value);
  }
}

impl PackedStore for &AtomicHeap {
  #[inline]
  fn read_explicit(&self, node: Node, width: u32) -> u32 {
    self.read_bits(bit_index_of(node, self.max_depth), width)
  }

  #[inline]
  fn write_explicit(&mut self, node: Node, width: u32, value: u32) {
    self.write_bits(bit_index_of(node, self.max_depth), width, value);
  }
}

#[cfg(test)]
#[path = "atomic_heap_test.rs"]
mod atomic_heap_test;
