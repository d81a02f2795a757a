//! TessellationConfig - fixed per-instance tessellation parameters.

use crate::cbt::heap::check_max_depth;
use crate::constants::{MAX_MAX_DEPTH, MAX_PARALLEL_MAX_DEPTH, MIN_MAX_DEPTH, MIN_PARALLEL_MAX_DEPTH};
use crate::error::Result;
use crate::leb::{RootTriangle, WindingConvention};

/// Parameters fixed for the lifetime of one tessellator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationConfig {
  /// Finest subdivision level.
  pub max_depth: u32,

  /// Corner and neighbour labelling convention.
  pub winding: WindingConvention,

  /// Corners of the depth-0 triangle, in the caller's coordinate space.
  pub root: RootTriangle,
}

impl Default for TessellationConfig {
  fn default() -> Self {
    Self {
      max_depth: 16,
      winding: WindingConvention::default(),
      root: RootTriangle::default(),
    }
  }
}

impl TessellationConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_winding(mut self, winding: WindingConvention) -> Self {
    self.winding = winding;
    self
  }

  pub fn with_root(mut self, root: RootTriangle) -> Self {
    self.root = root;
    self
  }

  /// Depth bounds of the sequential packed tree.
  pub fn validate_sequential(&self) -> Result<()> {
    check_max_depth(self.max_depth, MIN_MAX_DEPTH, MAX_MAX_DEPTH)
  }

  /// Depth bounds of the parallel mirror.
  ///
  /// Narrower at the bottom: the prepass kernel always folds five levels
  /// and the levelized dispatches start below them.
  pub fn validate_parallel(&self) -> Result<()> {
    check_max_depth(self.max_depth, MIN_PARALLEL_MAX_DEPTH, MAX_PARALLEL_MAX_DEPTH)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
