//! Tessellator - sequential refinement driver over the packed tree.
//!
//! Each refinement call runs exactly one pass, alternating split and merge
//! call by call, then reduces. Leaves are visited in index order while
//! being edited in place; updates only read counts the pass never writes,
//! so the result does not depend on visiting order.

use glam::{DVec2, Vec2};
use web_time::Instant;

use super::config::TessellationConfig;
use super::policy::{PassKind, PointTarget, RefinementPolicy};
use super::stats::RefinementStats;
use super::update::{update_leaf, LeafUpdate};
use crate::cbt::{ops, ConcurrentBinaryTree, Node};
use crate::error::Result;
use crate::leb::{self, corners_from_node, node_from_point, Corners, SameDepthNeighbourhood};

/// Adaptive triangle tessellation driven by a refinement policy.
#[derive(Clone, Debug)]
pub struct Tessellator {
  config: TessellationConfig,
  tree: ConcurrentBinaryTree,
  pass: PassKind,
}

impl Tessellator {
  /// Create a tessellation whose only leaf is the root triangle.
  pub fn new(config: TessellationConfig) -> Result<Self> {
    config.validate_sequential()?;
    let tree = ConcurrentBinaryTree::new(config.max_depth)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(max_depth = config.max_depth, winding = ?config.winding, "created tessellator");
    Ok(Self {
      config,
      tree,
      pass: PassKind::Split,
    })
  }

  #[inline]
  pub fn config(&self) -> &TessellationConfig {
    &self.config
  }

  /// Underlying tree, for leaf enumeration and raw values.
  #[inline]
  pub fn tree(&self) -> &ConcurrentBinaryTree {
    &self.tree
  }

  /// Pass the next refinement call will run.
  #[inline]
  pub fn next_pass(&self) -> PassKind {
    self.pass
  }

  #[inline]
  pub fn leaf_count(&self) -> u32 {
    self.tree.leaf_count()
  }

  /// One refinement step around `target`.
  ///
  /// Split pass: leaves containing the target split. Merge pass: leaves
  /// whose diamond excludes the target merge.
  pub fn refine_around_point(&mut self, target: DVec2) -> RefinementStats {
    self.refine(&PointTarget::new(target))
  }

  /// One refinement step driven by `policy`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tessellator::refine"))]
  pub fn refine<P: RefinementPolicy + ?Sized>(&mut self, policy: &P) -> RefinementStats {
    let start = Instant::now();
    let pass = self.pass;
    let leaf_count_before = self.tree.leaf_count();
    let mut stats = RefinementStats {
      pass,
      leaves_visited: leaf_count_before,
      leaf_count_before,
      ..Default::default()
    };

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("update_pass", ?pass).entered();
      for leaf_index in 0..leaf_count_before {
        let leaf = ops::leaf_index_to_node(self.tree.store(), leaf_index);
        match update_leaf(self.tree.store_mut(), leaf, pass, policy, &self.config) {
          LeafUpdate::Split => stats.splits_issued += 1,
          LeafUpdate::Merged => stats.merges_issued += 1,
          LeafUpdate::Unchanged => {}
        }
      }
    }

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("reduction").entered();
      self.tree.reduce();
    }

    self.pass = pass.next();
    stats.leaf_count_after = self.tree.leaf_count();
    stats.elapsed_us = start.elapsed().as_micros() as u64;
    stats
  }

  /// Restore the sum invariant after manual conforming edits.
  pub fn reduce(&mut self) {
    self.tree.reduce();
  }

  /// Conforming split of `node`. Call [`Self::reduce`] before reading counts.
  pub fn split_node_conforming(&mut self, node: Node) -> Result<()> {
    self.tree.check_node(node)?;
    leb::split_node_conforming(self.tree.store_mut(), node, self.config.winding);
    Ok(())
  }

  /// Conforming merge of `node`'s diamond. Returns whether it merged.
  pub fn merge_node_conforming(&mut self, node: Node) -> Result<bool> {
    self.tree.check_node(node)?;
    Ok(leb::merge_node_conforming(
      self.tree.store_mut(),
      node,
      self.config.winding,
    ))
  }

  /// Corners of any addressable node.
  pub fn corners(&self, node: Node) -> Result<Corners> {
    self.tree.check_node(node)?;
    Ok(corners_from_node(node, &self.config.root, self.config.winding))
  }

  /// Corners of the leaf at `leaf_index`.
  pub fn leaf_corners(&self, leaf_index: u32) -> Result<Corners> {
    let node = self.tree.leaf_index_to_node(leaf_index)?;
    Ok(corners_from_node(node, &self.config.root, self.config.winding))
  }

  /// Leaf under `point`, or [`Node::NULL`] outside the root triangle.
  pub fn node_from_point(&self, point: DVec2) -> Node {
    node_from_point(self.tree.store(), point, &self.config.root, self.config.winding)
  }

  /// Same-depth neighbours of `node` under this instance's convention.
  pub fn calculate_same_depth_neighbourhood(&self, node: Node) -> Result<SameDepthNeighbourhood> {
    self.tree.check_node(node)?;
    Ok(leb::calculate_same_depth_neighbourhood(node, self.config.winding))
  }

  /// Corners of every leaf, three per leaf, in leaf order.
  pub fn vertex_buffer(&self) -> Vec<Vec2> {
    let mut vertices = Vec::new();
    self.write_vertex_buffer(&mut vertices);
    vertices
  }

  /// Refill `vertices` with the current leaf triangles.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tessellator::vertex_buffer"))]
  pub fn write_vertex_buffer(&self, vertices: &mut Vec<Vec2>) {
    let TessellationConfig { winding, root, .. } = self.config;
    vertices.clear();
    vertices.reserve(3 * self.leaf_count() as usize);
    for leaf in self.tree.leaves() {
      let corners = corners_from_node(leaf, &root, winding);
      vertices.extend(corners.wound_f32(leaf.depth, winding));
    }
  }

  /// Raw packed heap words.
  #[inline]
  pub fn heap(&self) -> &[u32] {
    self.tree.heap()
  }

  /// Replace the packed heap (test and debug harnesses).
  pub fn replace_heap(&mut self, words: Vec<u32>) -> Result<()> {
    self.tree.replace_heap(words)
  }

  /// Back to the single root leaf and a split pass.
  pub fn reset(&mut self) -> Result<()> {
    self.tree = ConcurrentBinaryTree::new(self.config.max_depth)?.with_strategy(self.tree.strategy());
    self.pass = PassKind::Split;
    Ok(())
  }
}

#[cfg(test)]
#[path = "tessellator_test.rs"]
mod tessellator_test;
