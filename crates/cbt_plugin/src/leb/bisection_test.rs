use glam::DVec2;
use rand::Rng;

use super::*;
use crate::cbt::ConcurrentBinaryTree;
use crate::leb::{corners_from_node, Corners};
use crate::test_utils::{assert_conforming_tiling, leaves_of, random_leaf, seeded_rng, ReferenceTree};

const CONVENTIONS: [WindingConvention; 2] =
  [WindingConvention::Alternating, WindingConvention::Consistent];

fn split(tree: &mut ConcurrentBinaryTree, heap_index: u32, depth: u32, winding: WindingConvention) {
  split_node_conforming(tree.store_mut(), Node::new(heap_index, depth), winding);
  tree.reduce();
}

fn leaf_ids(tree: &ConcurrentBinaryTree) -> Vec<(u32, u32)> {
  tree.leaves().map(|n| (n.heap_index, n.depth)).collect()
}

/// Root, then its left child: leaves 4, 5, 3 in either convention.
fn three_leaf_tree(winding: WindingConvention) -> ConcurrentBinaryTree {
  let mut tree = ConcurrentBinaryTree::new(10).unwrap();
  split(&mut tree, 1, 0, winding);
  split(&mut tree, 2, 1, winding);
  tree
}

// =============================================================================
// Conforming split
// =============================================================================

#[test]
fn test_split_root_bisects_root_triangle() {
  for winding in CONVENTIONS {
    let mut tree = ConcurrentBinaryTree::new(10).unwrap();
    split(&mut tree, 1, 0, winding);
    assert_eq!(tree.leaf_count(), 2);

    let root = Corners::UNIT;
    let leaves: Vec<Node> = tree.leaves().collect();
    assert_eq!(leaves, vec![Node::new(2, 1), Node::new(3, 1)]);
    assert_eq!(corners_from_node(leaves[0], &root, winding), root.child(0, winding));
    assert_eq!(corners_from_node(leaves[1], &root, winding), root.child(1, winding));

    let m = root.hypotenuse_midpoint();
    assert_eq!(m, DVec2::new(0.5, 0.5));
    for leaf in leaves {
      assert!(corners_from_node(leaf, &root, winding).0.contains(&m));
    }
  }
}

#[test]
fn test_split_at_max_depth_is_noop() {
  for winding in CONVENTIONS {
    let mut tree = ConcurrentBinaryTree::with_initial_depth(5, 5).unwrap();
    let before = tree.heap().to_vec();
    split_node_conforming(tree.store_mut(), Node::new(40, 5), winding);
    assert_eq!(tree.heap(), &before[..]);
  }
}

/// The hypotenuse neighbour of (5, 2) sits under the coarser leaf 3, which
/// must split first.
#[test]
fn test_split_propagates_through_coarser_neighbour() {
  let alt = WindingConvention::Alternating;
  let mut tree = three_leaf_tree(alt);
  split(&mut tree, 5, 2, alt);
  assert_eq!(
    leaf_ids(&tree),
    vec![(4, 2), (10, 3), (11, 3), (12, 3), (13, 3), (7, 2)]
  );
  assert_conforming_tiling(&tree, &Corners::UNIT, alt);

  let consistent = WindingConvention::Consistent;
  let mut tree = three_leaf_tree(consistent);
  split(&mut tree, 4, 2, consistent);
  assert_eq!(
    leaf_ids(&tree),
    vec![(8, 3), (9, 3), (5, 2), (6, 2), (14, 3), (15, 3)]
  );
  assert_conforming_tiling(&tree, &Corners::UNIT, consistent);
}

/// Boundary hypotenuse: nothing to propagate into.
#[test]
fn test_split_on_boundary_stays_local() {
  let alt = WindingConvention::Alternating;
  let mut tree = three_leaf_tree(alt);
  split(&mut tree, 4, 2, alt);
  assert_eq!(leaf_ids(&tree), vec![(8, 3), (9, 3), (5, 2), (3, 1)]);
}

// =============================================================================
// Conforming merge
// =============================================================================

#[test]
fn test_diamond_parent() {
  let alt = WindingConvention::Alternating;
  assert_eq!(
    decode_diamond_parent(Node::new(10, 3), alt),
    DiamondParent {
      base: Node::new(5, 2),
      top: Node::new(6, 2),
    }
  );
  // Parent on the boundary: the diamond folds onto the parent.
  assert_eq!(
    decode_diamond_parent(Node::new(4, 2), alt),
    DiamondParent {
      base: Node::new(2, 1),
      top: Node::new(2, 1),
    }
  );
  assert_eq!(decode_diamond_parent(Node::ROOT, alt).base, Node::NULL);
}

#[test]
fn test_merge_root_is_noop() {
  for winding in CONVENTIONS {
    let mut tree = ConcurrentBinaryTree::new(8).unwrap();
    let before = tree.heap().to_vec();
    assert!(!merge_node_conforming(tree.store_mut(), Node::ROOT, winding));
    assert_eq!(tree.heap(), &before[..]);
  }
}

#[test]
fn test_merge_collapses_diamond() {
  for winding in CONVENTIONS {
    let mut tree = three_leaf_tree(winding);
    split(&mut tree, 3, 1, winding);
    assert_eq!(tree.leaf_count(), 4);

    // Boundary diamond: only 2 collapses.
    assert!(merge_node_conforming(tree.store_mut(), Node::new(5, 2), winding));
    tree.reduce();
    assert_eq!(leaf_ids(&tree), vec![(2, 1), (6, 2), (7, 2)]);
    assert_conforming_tiling(&tree, &Corners::UNIT, winding);
  }
}

/// Both diamond halves clear together, undoing a propagated split.
#[test]
fn test_merge_undoes_propagated_split() {
  let alt = WindingConvention::Alternating;
  let mut tree = three_leaf_tree(alt);
  split(&mut tree, 5, 2, alt);
  assert!(merge_node_conforming(tree.store_mut(), Node::new(11, 3), alt));
  tree.reduce();
  assert_eq!(leaf_ids(&tree), vec![(4, 2), (5, 2), (6, 2), (7, 2)]);
  assert_conforming_tiling(&tree, &Corners::UNIT, alt);
}

#[test]
fn test_merge_with_unqualified_diamond_is_noop() {
  let alt = WindingConvention::Alternating;
  let mut tree = three_leaf_tree(alt);
  split(&mut tree, 5, 2, alt);
  let before = tree.heap().to_vec();

  // Parent 3 holds three leaves.
  assert!(!merge_node_conforming(tree.store_mut(), Node::new(7, 2), alt));
  assert_eq!(tree.heap(), &before[..]);
  tree.reduce();
  assert_eq!(tree.heap(), &before[..]);
}

/// Any refused merge leaves every word untouched.
#[test]
fn test_refused_merges_never_write() {
  let mut rng = seeded_rng(0xD1A);
  for winding in CONVENTIONS {
    let mut tree = ConcurrentBinaryTree::new(12).unwrap();
    for _ in 0..200 {
      let leaf = random_leaf(tree.store(), &mut rng);
      if rng.random_bool(0.6) {
        split_node_conforming(tree.store_mut(), leaf, winding);
      } else {
        let before = tree.heap().to_vec();
        if !merge_node_conforming(tree.store_mut(), leaf, winding) {
          assert_eq!(tree.heap(), &before[..], "{winding:?} refused merge of {leaf:?} wrote");
        }
      }
      tree.reduce();
    }
  }
}

// =============================================================================
// Random sequences
// =============================================================================

#[test]
fn test_random_operations_keep_mesh_conforming() {
  let mut rng = seeded_rng(7);
  for winding in CONVENTIONS {
    for max_depth in [5, 8, 12] {
      let mut tree = ConcurrentBinaryTree::new(max_depth).unwrap();
      for step in 0..150 {
        let leaf = random_leaf(tree.store(), &mut rng);
        if rng.random_bool(0.6) {
          split_node_conforming(tree.store_mut(), leaf, winding);
        } else {
          merge_node_conforming(tree.store_mut(), leaf, winding);
        }
        tree.reduce();
        if step % 10 == 0 {
          assert_conforming_tiling(&tree, &Corners::UNIT, winding);
        }
      }
      assert_conforming_tiling(&tree, &Corners::UNIT, winding);
    }
  }
}

/// Packed heap and one-word-per-node oracle agree on every node value
/// after every step.
#[test]
fn test_packed_matches_reference_tree() {
  let mut rng = seeded_rng(0x5EED);
  for (max_depth, winding) in [(18, WindingConvention::Alternating), (20, WindingConvention::Consistent)] {
    let mut packed = ConcurrentBinaryTree::new(max_depth).unwrap();
    let mut reference = ReferenceTree::new(max_depth);
    assert_eq!(packed.node_values(), reference.values());

    let steps = rng.random_range(25..=50);
    for step in 0..steps {
      assert_eq!(leaves_of(packed.store()), leaves_of(&reference), "step {step}");
      let leaf = random_leaf(&reference, &mut rng);
      if rng.random_bool(0.7) {
        split_node_conforming(packed.store_mut(), leaf, winding);
        split_node_conforming(&mut reference, leaf, winding);
      } else {
        let merged = merge_node_conforming(packed.store_mut(), leaf, winding);
        assert_eq!(merged, merge_node_conforming(&mut reference, leaf, winding));
      }
      packed.reduce();
      reference.reduce();
      assert_eq!(packed.node_values(), reference.values(), "depth {max_depth} step {step}");
    }
  }
}
