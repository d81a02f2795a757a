use rand::Rng;
use rayon::prelude::*;

use super::*;
use crate::cbt::reduction::reduce_bit_parallel;
use crate::cbt::PackedHeap;
use crate::error::CbtError;
use crate::test_utils::seeded_rng;

#[test]
fn test_new_writes_header() {
  let heap = AtomicHeap::new(9).unwrap();
  let words = heap.snapshot();
  assert_eq!(words.len(), heap_word_count(9));
  assert_eq!(words[0], 9);
  assert!(words[1..].iter().all(|&word| word == 0));
}

#[test]
fn test_depth_bounds() {
  assert!(AtomicHeap::new(6).is_err());
  assert!(AtomicHeap::new(7).is_ok());
}

#[test]
fn test_from_words_checks_layout() {
  let packed = PackedHeap::new(8);
  assert!(AtomicHeap::from_words(8, packed.words()).is_ok());
  assert!(matches!(
    AtomicHeap::from_words(8, &packed.words()[1..]),
    Err(CbtError::HeapSizeMismatch { .. })
  ));
  let mut wrong_header = packed.words().to_vec();
  wrong_header[0] = 7;
  assert_eq!(
    AtomicHeap::from_words(8, &wrong_header).unwrap_err(),
    CbtError::HeapHeaderMismatch {
      expected: 8,
      found: 7,
    }
  );
}

/// Same edits, same reduction: same words as the plain packed heap.
#[test]
fn test_matches_packed_heap() {
  let max_depth = 11;
  let mut rng = seeded_rng(3);
  let mut packed = PackedHeap::new(max_depth);
  let atomic = AtomicHeap::new(max_depth).unwrap();
  let mut shared = &atomic;
  for heap_index in (1u32 << max_depth)..(2u32 << max_depth) {
    if rng.random_bool(0.3) {
      let leaf = Node::new(heap_index, max_depth);
      packed.set_value(leaf, 1);
      shared.set_value(leaf, 1);
    }
  }
  reduce_bit_parallel(&mut packed);
  reduce_bit_parallel(&mut shared);
  assert_eq!(atomic.snapshot(), packed.words());
  assert_eq!(shared.value(Node::ROOT), packed.value(Node::ROOT));
}

/// Fields straddling two words read back intact.
#[test]
fn test_wide_fields_round_trip() {
  let max_depth = 20;
  let heap = AtomicHeap::new(max_depth).unwrap();
  let mut store = &heap;
  for depth in 0..8 {
    let width = field_width(depth, max_depth);
    for heap_index in (1u32 << depth)..(2u32 << depth) {
      let node = Node::new(heap_index, depth);
      let value = (heap_index.wrapping_mul(2_654_435_761)) & ((1u32 << width) - 1);
      store.set_value(node, value);
      assert_eq!(store.value(node), value, "{node:?}");
    }
  }
}

/// Concurrent marker writes into shared words never lose a bit.
#[test]
fn test_concurrent_marker_writes() {
  let max_depth = 14;
  let heap = AtomicHeap::new(max_depth).unwrap();
  let first = 1u32 << max_depth;
  (0..first).into_par_iter().for_each(|offset| {
    let mut store = &heap;
    store.set_value(Node::new(first + offset, max_depth), offset & 1);
  });
  let store = &heap;
  for offset in 0..first {
    assert_eq!(store.value(Node::new(first + offset, max_depth)), offset & 1);
  }

  (0..first).into_par_iter().for_each(|offset| {
    let mut store = &heap;
    store.set_value(Node::new(first + offset, max_depth), 0);
  });
  assert_eq!(heap.snapshot()[1..].iter().filter(|&&word| word != 0).count(), 0);
}

#[test]
fn test_upload_replaces_words() {
  let mut heap = AtomicHeap::new(8).unwrap();
  let mut packed = PackedHeap::new(8);
  packed.set_value(Node::ROOT.ceil(8), 1);
  heap.upload(packed.words()).unwrap();
  assert_eq!(heap.snapshot(), packed.words());
  assert!(heap.upload(&[8]).is_err());
}
