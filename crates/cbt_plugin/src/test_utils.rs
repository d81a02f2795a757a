//! Test utilities shared across modules.
//!
//! Provides the one-word-per-node reference tree used as a correctness
//! oracle for the packed heap, and mesh checks for conforming
//! triangulations.

use std::collections::HashSet;

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cbt::{ops, ConcurrentBinaryTree, Node, NodeStore};
use crate::leb::{corners_from_node, Corners, WindingConvention};

// =============================================================================
// Reference tree
// =============================================================================

/// Unpacked tree: one `u32` per node, indexed by heap index.
///
/// Runs the same generic leaf operations as the packed heap, so any
/// divergence points at packing or the bit-parallel reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceTree {
  max_depth: u32,
  values: Vec<u32>,
}

impl ReferenceTree {
  pub fn new(max_depth: u32) -> Self {
    let mut tree = Self {
      max_depth,
      values: vec![0; 2usize << max_depth],
    };
    tree.values[1usize << max_depth] = 1;
    tree.reduce();
    tree
  }

  /// Plain level-by-level sum.
  pub fn reduce(&mut self) {
    for depth in (0..self.max_depth).rev() {
      for heap_index in (1usize << depth)..(2usize << depth) {
        self.values[heap_index] = self.values[2 * heap_index] + self.values[2 * heap_index + 1];
      }
    }
  }

  /// Values indexed by heap index (slot 0 unused).
  pub fn values(&self) -> &[u32] {
    &self.values
  }
}

impl NodeStore for ReferenceTree {
  fn max_depth(&self) -> u32 {
    self.max_depth
  }

  fn value(&self, node: Node) -> u32 {
    self.values[node.heap_index as usize]
  }

  fn set_value(&mut self, node: Node, value: u32) {
    self.values[node.heap_index as usize] = value;
  }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Deterministic RNG for a test.
pub fn seeded_rng(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}

/// Uniform random point inside the unit root triangle.
pub fn random_point_in_unit_triangle(rng: &mut StdRng) -> DVec2 {
  let x: f64 = rng.random();
  let y: f64 = rng.random();
  if x + y > 1.0 {
    DVec2::new(1.0 - x, 1.0 - y)
  } else {
    DVec2::new(x, y)
  }
}

// =============================================================================
// Mesh checks
// =============================================================================

fn vertex_key(v: DVec2) -> (u64, u64) {
  (v.x.to_bits(), v.y.to_bits())
}

/// Assert the tree's leaves tile `root` exactly and without T-junctions.
///
/// Corners are exact in `f64` for dyadic roots, so both checks compare
/// exactly: leaf areas sum to the root area, and no leaf edge has another
/// leaf's vertex at its midpoint.
pub fn assert_conforming_tiling(tree: &ConcurrentBinaryTree, root: &Corners, winding: WindingConvention) {
  let leaves: Vec<Node> = tree.leaves().collect();
  assert_eq!(leaves.len() as u32, tree.leaf_count());

  let triangles: Vec<Corners> = leaves
    .iter()
    .map(|&leaf| corners_from_node(leaf, root, winding))
    .collect();

  let area: f64 = triangles.iter().map(|t| t.doubled_signed_area().abs()).sum();
  assert_eq!(area, root.doubled_signed_area().abs(), "leaves do not tile the root");

  let vertices: HashSet<(u64, u64)> = triangles
    .iter()
    .flat_map(|t| t.0.iter().copied().map(vertex_key))
    .collect();
  for (leaf, t) in leaves.iter().zip(&triangles) {
    let [v0, v1, v2] = t.0;
    for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
      let midpoint = (a + b) * 0.5;
      assert!(
        !vertices.contains(&vertex_key(midpoint)),
        "T-junction on leaf {leaf:?} at {midpoint}"
      );
    }
  }
}

/// Leaf nodes of a store, read through post-reduction counts.
pub fn leaves_of<S: NodeStore>(store: &S) -> Vec<Node> {
  let count = ops::leaf_count(store);
  (0..count)
    .map(|leaf_index| ops::leaf_index_to_node(store, leaf_index))
    .collect()
}

/// Pick a random current leaf.
pub fn random_leaf<S: NodeStore>(store: &S, rng: &mut StdRng) -> Node {
  let count = ops::leaf_count(store);
  ops::leaf_index_to_node(store, rng.random_range(0..count))
}
