//! Triangle corners of a node, and the inverse point -> leaf lookup.
//!
//! Corners are `(v0, v1, v2)`: hypotenuse `v0 - v2`, apex `v1`. Every
//! bisection cuts the hypotenuse at its midpoint, so the corners of any
//! node are a replay of its path bits from the root triangle.

use glam::{DVec2, Vec2};

use super::neighbourhood::WindingConvention;
use crate::cbt::{Node, NodeStore};

/// The three corners of one triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners(pub [DVec2; 3]);

/// Corners of the tree's root triangle.
pub type RootTriangle = Corners;

impl Default for Corners {
  /// Unit right triangle `(0,1), (0,0), (1,0)`.
  fn default() -> Self {
    Self::UNIT
  }
}

impl Corners {
  /// Unit right triangle with its right angle at the origin.
  pub const UNIT: Self = Self([DVec2::new(0.0, 1.0), DVec2::ZERO, DVec2::new(1.0, 0.0)]);

  #[inline]
  pub const fn new(v0: DVec2, v1: DVec2, v2: DVec2) -> Self {
    Self([v0, v1, v2])
  }

  /// Midpoint of the hypotenuse (the split point).
  #[inline]
  pub fn hypotenuse_midpoint(&self) -> DVec2 {
    (self.0[0] + self.0[2]) * 0.5
  }

  #[inline]
  pub fn hypotenuse_length(&self) -> f64 {
    self.0[0].distance(self.0[2])
  }

  #[inline]
  pub fn centroid(&self) -> DVec2 {
    (self.0[0] + self.0[1] + self.0[2]) / 3.0
  }

  /// Twice the signed area (positive when counter-clockwise).
  #[inline]
  pub fn doubled_signed_area(&self) -> f64 {
    (self.0[1] - self.0[0]).perp_dot(self.0[2] - self.0[0])
  }

  /// Corners of the child selected by `bit` under `winding`.
  #[inline]
  pub fn child(&self, bit: u32, winding: WindingConvention) -> Self {
    let [v0, v1, v2] = self.0;
    let m = self.hypotenuse_midpoint();
    match (bit & 1, winding) {
      (0, WindingConvention::Alternating) => Self([v0, m, v1]),
      (_, WindingConvention::Alternating) => Self([v1, m, v2]),
      (0, WindingConvention::Consistent) => Self([v1, m, v0]),
      (_, WindingConvention::Consistent) => Self([v2, m, v1]),
    }
  }

  /// Inclusive point-in-triangle test, independent of winding.
  ///
  /// Points on an edge or corner are inside. NaN is never inside.
  pub fn contains(&self, point: DVec2) -> bool {
    let [v0, v1, v2] = self.0;
    let d0 = (v1 - v0).perp_dot(point - v0);
    let d1 = (v2 - v1).perp_dot(point - v1);
    let d2 = (v0 - v2).perp_dot(point - v2);
    (d0 >= 0.0 && d1 >= 0.0 && d2 >= 0.0) || (d0 <= 0.0 && d1 <= 0.0 && d2 <= 0.0)
  }

  /// Corners in output order for a triangle at `depth`.
  ///
  /// Under [`WindingConvention::Alternating`] odd depths come out reversed
  /// so every emitted triangle has the root's winding.
  #[inline]
  pub fn wound(&self, depth: u32, winding: WindingConvention) -> [DVec2; 3] {
    let [v0, v1, v2] = self.0;
    match winding {
      WindingConvention::Alternating if depth & 1 == 1 => [v2, v1, v0],
      _ => self.0,
    }
  }

  /// [`Self::wound`] narrowed to `f32` for vertex upload.
  #[inline]
  pub fn wound_f32(&self, depth: u32, winding: WindingConvention) -> [Vec2; 3] {
    self.wound(depth, winding).map(|v| v.as_vec2())
  }
}

/// Corners of `node` inside `root`.
pub fn corners_from_node(node: Node, root: &RootTriangle, winding: WindingConvention) -> Corners {
  node
    .path_bits()
    .fold(*root, |corners, bit| corners.child(bit, winding))
}

/// Leaf containing `point`, or [`Node::NULL`] outside the root triangle.
///
/// Descends from the root using post-reduction counts, testing the left
/// child at every level. Points on a shared edge resolve to the left side.
pub fn node_from_point<S: NodeStore>(
  store: &S,
  point: DVec2,
  root: &RootTriangle,
  winding: WindingConvention,
) -> Node {
  if !root.contains(point) {
    return Node::NULL;
  }
  let mut node = Node::ROOT;
  let mut corners = *root;
  while store.value(node) > 1 {
    let left = corners.child(0, winding);
    if left.contains(point) {
      node = node.left_child();
      corners = left;
    } else {
      node = node.right_child();
      corners = corners.child(1, winding);
    }
  }
  node
}

#[cfg(test)]
#[path = "corners_test.rs"]
mod corners_test;
