//! Per-leaf update shared by the sequential driver and the parallel kernel.

use super::config::TessellationConfig;
use super::policy::{PassKind, RefinementPolicy};
use crate::cbt::{Node, NodeStore};
use crate::leb::{corners_from_node, decode_diamond_parent, merge_node_conforming, split_node_conforming};

/// Outcome of one leaf update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafUpdate {
  Unchanged,
  Split,
  Merged,
}

/// Run one pass of `policy` on a single leaf.
///
/// Reads only post-reduction counts above the deepest level, so updates of
/// different leaves within one pass commute.
#[inline]
pub fn update_leaf<S, P>(
  store: &mut S,
  leaf: Node,
  pass: PassKind,
  policy: &P,
  config: &TessellationConfig,
) -> LeafUpdate
where
  S: NodeStore,
  P: RefinementPolicy + ?Sized,
{
  let winding = config.winding;
  match pass {
    PassKind::Split => {
      if leaf.depth >= store.max_depth() {
        return LeafUpdate::Unchanged;
      }
      let corners = corners_from_node(leaf, &config.root, winding);
      if policy.should_split(&corners) {
        split_node_conforming(store, leaf, winding);
        LeafUpdate::Split
      } else {
        LeafUpdate::Unchanged
      }
    }
    PassKind::Merge => {
      if leaf.heap_index <= 1 {
        return LeafUpdate::Unchanged;
      }
      let diamond = decode_diamond_parent(leaf, winding);
      let base = corners_from_node(diamond.base, &config.root, winding);
      let top = corners_from_node(diamond.top, &config.root, winding);
      if policy.should_merge(&base, &top) && merge_node_conforming(store, leaf, winding) {
        LeafUpdate::Merged
      } else {
        LeafUpdate::Unchanged
      }
    }
  }
}
