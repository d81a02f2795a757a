use super::*;

// =========================================================================
// AccessPlan
// =========================================================================

#[test]
fn test_plan_inside_one_word() {
  let plan = AccessPlan::new(35, 7);
  assert_eq!(plan.first_word, 1);
  assert_eq!(plan.first_offset, 3);
  assert_eq!(plan.first_width, 7);
  assert_eq!(plan.second_width, 0);
  assert!(!plan.straddles());
}

/// Bits 28..36 span words 0 and 1: 4 bits in each.
#[test]
fn test_plan_straddling_two_words() {
  let plan = AccessPlan::new(28, 8);
  assert_eq!(plan.first_word, 0);
  assert_eq!(plan.first_offset, 28);
  assert_eq!(plan.first_width, 4);
  assert_eq!(plan.second_word, 1);
  assert_eq!(plan.second_width, 4);
  assert!(plan.straddles());
}

#[test]
fn test_plan_full_aligned_word() {
  let plan = AccessPlan::new(64, 32);
  assert_eq!(plan.first_word, 2);
  assert_eq!(plan.first_offset, 0);
  assert_eq!(plan.first_width, 32);
  assert!(!plan.straddles());
}

// =========================================================================
// Chunk helpers
// =========================================================================

#[test]
fn test_chunk_mask_edges() {
  assert_eq!(chunk_mask(0), 0);
  assert_eq!(chunk_mask(1), 1);
  assert_eq!(chunk_mask(31), 0x7FFF_FFFF);
  assert_eq!(chunk_mask(32), u32::MAX);
}

#[test]
fn test_write_chunk_preserves_other_bits() {
  let word = 0xFFFF_FFFF;
  let written = write_chunk(word, 4, 4, 0b0101);
  assert_eq!(written, 0xFFFF_FF5F);
  assert_eq!(read_chunk(written, 4, 4), 0b0101);
}

// =========================================================================
// PackedBitArray
// =========================================================================

#[test]
fn test_straddling_field_read_back() {
  let mut array = PackedBitArray::new(4);
  array.set(27, 13, 0x1ABC).unwrap();
  assert_eq!(array.get(27, 13).unwrap(), 0x1ABC);
  // Low 5 bits land at the top of word 0, the rest at the bottom of word 1.
  assert_eq!(array.words()[0] >> 27, 0x1ABC & 0x1F);
  assert_eq!(array.words()[1], 0x1ABC >> 5);
}

/// Writing one field must not disturb its neighbours on either side.
#[test]
fn test_adjacent_fields_are_independent() {
  let mut array = PackedBitArray::new(4);
  let widths = [3u32, 7, 11, 5, 31, 1, 19];
  let mut offset = 0u64;
  let mut fields = Vec::new();
  for (i, &width) in widths.iter().enumerate() {
    let value = (0x5A5A_5A5A_u32.rotate_left(i as u32)) & chunk_mask(width);
    array.set(offset, width, value).unwrap();
    fields.push((offset, width, value));
    offset += u64::from(width);
  }
  for &(offset, width, value) in &fields {
    assert_eq!(array.get(offset, width).unwrap(), value, "field at {offset}");
  }

  // Overwrite the middle field with all ones and recheck the rest.
  let (mid_offset, mid_width, _) = fields[4];
  array.set(mid_offset, mid_width, chunk_mask(mid_width)).unwrap();
  for (i, &(offset, width, value)) in fields.iter().enumerate() {
    let expected = if i == 4 { chunk_mask(width) } else { value };
    assert_eq!(array.get(offset, width).unwrap(), expected);
  }
}

#[test]
fn test_zero_width_access_reads_zero() {
  let array = PackedBitArray::from_words(vec![u32::MAX; 2]);
  assert_eq!(array.get(10, 0).unwrap(), 0);
}

#[test]
fn test_rejects_wide_access() {
  let array = PackedBitArray::new(4);
  assert_eq!(
    array.get(0, 33),
    Err(CbtError::UnsupportedBitWidth { width: 33, max: 32 })
  );
}

#[test]
fn test_rejects_out_of_range_access() {
  let mut array = PackedBitArray::new(2);
  assert_eq!(array.bit_capacity(), 64);
  assert!(array.get(60, 4).is_ok());
  assert_eq!(
    array.set(60, 5, 1),
    Err(CbtError::BitIndexOutOfRange {
      bit_index: 60,
      width: 5,
      capacity: 64,
    })
  );
}
