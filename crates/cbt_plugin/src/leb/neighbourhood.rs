//! Same-depth neighbourhood of a node, derived from its address alone.
//!
//! Start from the root's neighbourhood `{0, 0, 0, 1}` and replay the path
//! bits most significant first. Each bit maps the quadruple of the parent
//! to the quadruple of the child through a fixed bit-doubling transform.
//! An id of 0 means "no neighbour" (domain boundary) and stays 0.

use crate::cbt::Node;

/// Vertex-winding and neighbour labelling convention of one tree instance.
///
/// Corners are `(v0, v1, v2)` with hypotenuse `v0 - v2` and apex `v1`.
/// Pick one per instance; never mix them within one tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindingConvention {
  /// Children `(v0, m, v1)` and `(v1, m, v2)`. Winding flips every level,
  /// so odd-depth triangles are reversed on output. Left neighbour shares
  /// edge `v1 - v2`, right neighbour shares `v0 - v1`.
  #[default]
  Alternating,
  /// Children `(v1, m, v0)` and `(v2, m, v1)`. Winding is preserved at
  /// every level. Left neighbour shares edge `v0 - v1`, right neighbour
  /// shares `v1 - v2`.
  Consistent,
}

/// Same-depth neighbour ids of one node (0 = none).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SameDepthNeighbourhood {
  /// Neighbour across the left leg.
  pub left: u32,
  /// Neighbour across the right leg.
  pub right: u32,
  /// Neighbour across the hypotenuse.
  pub edge: u32,
  /// The node itself.
  pub node: u32,
}

/// `2 * id + (id != 0)`: the child id that keeps a null neighbour null.
#[inline(always)]
const fn odd_child(id: u32) -> u32 {
  (id << 1) | (id != 0) as u32
}

impl SameDepthNeighbourhood {
  /// The root has no neighbours.
  pub const ROOT: Self = Self {
    left: 0,
    right: 0,
    edge: 0,
    node: 1,
  };

  /// Neighbourhood of the child selected by `bit`.
  #[inline]
  pub const fn split(self, bit: u32, winding: WindingConvention) -> Self {
    let Self {
      left,
      right,
      edge,
      node,
    } = self;
    match (bit & 1, winding) {
      (0, WindingConvention::Alternating) => Self {
        left: (node << 1) | 1,
        right: odd_child(edge),
        edge: odd_child(right),
        node: node << 1,
      },
      (0, WindingConvention::Consistent) => Self {
        left: (node << 1) | 1,
        right: odd_child(edge),
        edge: odd_child(left),
        node: node << 1,
      },
      (_, WindingConvention::Alternating) => Self {
        left: edge << 1,
        right: node << 1,
        edge: left << 1,
        node: (node << 1) | 1,
      },
      (_, WindingConvention::Consistent) => Self {
        left: edge << 1,
        right: node << 1,
        edge: right << 1,
        node: (node << 1) | 1,
      },
    }
  }

  /// Id as a node at `depth`, or [`Node::NULL`] for 0.
  #[inline]
  pub const fn to_node(id: u32, depth: u32) -> Node {
    if id == 0 {
      Node::NULL
    } else {
      Node::new(id, depth)
    }
  }
}

/// Same-depth left/right/edge neighbours of `node`.
#[inline]
pub fn calculate_same_depth_neighbourhood(
  node: Node,
  winding: WindingConvention,
) -> SameDepthNeighbourhood {
  node
    .path_bits()
    .fold(SameDepthNeighbourhood::ROOT, |neighbourhood, bit| {
      neighbourhood.split(bit, winding)
    })
}

/// Neighbour across the hypotenuse, or [`Node::NULL`] on the boundary.
#[inline]
pub fn edge_neighbour(node: Node, winding: WindingConvention) -> Node {
  let edge = calculate_same_depth_neighbourhood(node, winding).edge;
  SameDepthNeighbourhood::to_node(edge, node.depth)
}

#[cfg(test)]
#[path = "neighbourhood_test.rs"]
mod neighbourhood_test;
