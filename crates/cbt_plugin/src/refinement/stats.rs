//! Statistics from one refinement call.

use super::policy::PassKind;

/// What one refinement call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementStats {
  /// Pass that ran.
  pub pass: PassKind,
  /// Leaves the update visited (leaf count before the pass).
  pub leaves_visited: u32,
  /// Leaves whose policy asked for a split below max depth.
  pub splits_issued: u32,
  /// Conforming merges that cleared markers.
  pub merges_issued: u32,
  /// Leaf count before the pass.
  pub leaf_count_before: u32,
  /// Leaf count after the reduction.
  pub leaf_count_after: u32,
  /// Wall time of the whole call in microseconds.
  pub elapsed_us: u64,
}

impl RefinementStats {
  /// Net change in leaf count.
  #[inline]
  pub fn leaf_delta(&self) -> i64 {
    self.leaf_count_after as i64 - self.leaf_count_before as i64
  }

  /// True when the pass issued any split or merge.
  #[inline]
  pub fn changed(&self) -> bool {
    self.splits_issued + self.merges_issued > 0
  }
}
