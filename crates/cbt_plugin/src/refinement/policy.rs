//! Split/merge predicates that drive a refinement pass.
//!
//! A policy only looks at geometry. The driver decides which pass runs and
//! turns the answers into conforming splits or merges, so the same policy
//! can run on the sequential tree and on the parallel mirror.

use glam::DVec2;

use crate::leb::Corners;

/// Which half of the split/merge alternation a call runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PassKind {
  #[default]
  Split,
  Merge,
}

impl PassKind {
  /// The pass that follows this one.
  #[inline]
  pub const fn next(self) -> Self {
    match self {
      Self::Split => Self::Merge,
      Self::Merge => Self::Split,
    }
  }
}

/// Decides, per leaf, whether to refine or coarsen.
pub trait RefinementPolicy: Sync {
  /// Whether a leaf with these corners should split (split pass).
  fn should_split(&self, leaf: &Corners) -> bool;

  /// Whether a leaf may merge, given both triangles of its diamond
  /// (merge pass). `base == top` on the domain boundary.
  fn should_merge(&self, base: &Corners, top: &Corners) -> bool;
}

/// Refine around a point: split leaves containing it, merge away from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointTarget {
  pub target: DVec2,
}

impl PointTarget {
  pub const fn new(target: DVec2) -> Self {
    Self { target }
  }
}

impl RefinementPolicy for PointTarget {
  #[inline]
  fn should_split(&self, leaf: &Corners) -> bool {
    leaf.contains(self.target)
  }

  /// Both halves must exclude the target, or the next split pass would
  /// split the merged leaf right back.
  #[inline]
  fn should_merge(&self, base: &Corners, top: &Corners) -> bool {
    !base.contains(self.target) && !top.contains(self.target)
  }
}

/// Distance-driven level of detail around a viewer.
///
/// A triangle is too coarse while its centroid is closer to the viewer
/// than `factor` times its hypotenuse length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceLod {
  pub viewer: DVec2,
  pub factor: f64,
}

impl DistanceLod {
  pub const fn new(viewer: DVec2, factor: f64) -> Self {
    Self { viewer, factor }
  }

  #[inline]
  fn too_coarse(&self, triangle: &Corners) -> bool {
    self.viewer.distance(triangle.centroid()) < triangle.hypotenuse_length() * self.factor
  }
}

impl RefinementPolicy for DistanceLod {
  #[inline]
  fn should_split(&self, leaf: &Corners) -> bool {
    self.too_coarse(leaf)
  }

  #[inline]
  fn should_merge(&self, base: &Corners, top: &Corners) -> bool {
    !self.too_coarse(base) && !self.too_coarse(top)
  }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;
