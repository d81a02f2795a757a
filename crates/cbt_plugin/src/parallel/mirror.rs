//! ParallelTessellator - the refinement state machine as parallel kernels.
//!
//! One frame is a fixed sequence of dispatches, each followed by a barrier:
//!
//! 1. Update kernel, one invocation per leaf, sized from the indirect
//!    buffer so the host never reads the live leaf count.
//! 2. Bit-parallel prepass kernel, one invocation per 32 leaf markers.
//! 3. One reduction kernel per remaining level, deepest first.
//! 4. Indirect derivation kernel (single invocation).
//!
//! Update invocations decode their own leaf and edit markers in place.
//! Splits only set markers that are either already set or never read by a
//! decode; merges only clear markers no decode reads. The resulting heap is
//! the same bit for bit as the sequential driver's.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::{DVec2, Vec2};
use rayon::prelude::*;
use web_time::Instant;

use super::atomic_heap::AtomicHeap;
use super::dispatch::{IndirectArgs, IndirectBuffer, KernelQueue, QueueStats};
use crate::cbt::reduction::{prepass_word_count, reduce_node, reduce_prepass_word};
use crate::cbt::{ops, Node, NodeStore};
use crate::constants::{BIT_PARALLEL_LEVELS, LEAF_MARKERS_PER_FOLD};
use crate::error::{CbtError, Result};
use crate::leb::{self, corners_from_node, node_from_point, SameDepthNeighbourhood};
use crate::refinement::{update_leaf, LeafUpdate, PassKind, PointTarget, RefinementPolicy, RefinementStats, TessellationConfig};

/// Data-parallel mirror of [`Tessellator`](crate::refinement::Tessellator).
#[derive(Debug)]
pub struct ParallelTessellator {
  config: TessellationConfig,
  heap: AtomicHeap,
  indirect: IndirectBuffer,
  queue: KernelQueue,
  pass: PassKind,
}

impl ParallelTessellator {
  /// Create a mirror whose only leaf is the root triangle.
  pub fn new(config: TessellationConfig) -> Result<Self> {
    config.validate_parallel()?;
    let heap = AtomicHeap::new(config.max_depth)?;
    let mut store = &heap;
    store.set_value(Node::ROOT.ceil(config.max_depth), 1);

    let mut mirror = Self {
      config,
      heap,
      indirect: IndirectBuffer::new(IndirectArgs::default()),
      queue: KernelQueue::new(),
      pass: PassKind::Split,
    };
    mirror.reduce();
    mirror.derive_indirect();
    #[cfg(feature = "tracing")]
    tracing::debug!(max_depth = config.max_depth, winding = ?config.winding, "created parallel tessellator");
    Ok(mirror)
  }

  #[inline]
  pub fn config(&self) -> &TessellationConfig {
    &self.config
  }

  #[inline]
  pub fn next_pass(&self) -> PassKind {
    self.pass
  }

  /// Current indirect buffer contents.
  #[inline]
  pub fn indirect_args(&self) -> IndirectArgs {
    self.indirect.read()
  }

  /// Leaf count from the indirect draw command.
  #[inline]
  pub fn leaf_count(&self) -> u32 {
    self.indirect.read().draw.vertex_count / 3
  }

  #[inline]
  pub fn queue_stats(&self) -> QueueStats {
    self.queue.stats()
  }

  /// One refinement frame around `target`.
  pub fn refine_around_point(&mut self, target: DVec2) -> RefinementStats {
    self.refine(&PointTarget::new(target))
  }

  /// One refinement frame driven by `policy`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "parallel::refine"))]
  pub fn refine<P: RefinementPolicy + ?Sized>(&mut self, policy: &P) -> RefinementStats {
    let start = Instant::now();
    let pass = self.pass;
    let leaf_count_before = self.leaf_count();
    let visited = AtomicU32::new(0);
    let splits = AtomicU32::new(0);
    let merges = AtomicU32::new(0);

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("update_kernel", ?pass).entered();
      let Self {
        config,
        heap,
        indirect,
        queue,
        ..
      } = self;
      let heap: &AtomicHeap = heap;
      let config: &TessellationConfig = config;
      queue.dispatch_indirect(&indirect.read(), |id| {
        let mut store = heap;
        if id >= ops::leaf_count(&store) {
          return;
        }
        visited.fetch_add(1, Ordering::Relaxed);
        let leaf = ops::leaf_index_to_node(&store, id);
        match update_leaf(&mut store, leaf, pass, policy, config) {
          LeafUpdate::Split => {
            splits.fetch_add(1, Ordering::Relaxed);
          }
          LeafUpdate::Merged => {
            merges.fetch_add(1, Ordering::Relaxed);
          }
          LeafUpdate::Unchanged => {}
        }
      });
      queue.barrier();
    }

    self.reduce();
    self.derive_indirect();
    self.pass = pass.next();

    RefinementStats {
      pass,
      leaves_visited: visited.into_inner(),
      splits_issued: splits.into_inner(),
      merges_issued: merges.into_inner(),
      leaf_count_before,
      leaf_count_after: self.leaf_count(),
      elapsed_us: start.elapsed().as_micros() as u64,
    }
  }

  /// Levelized reduction: prepass kernel, then one kernel per level.
  fn reduce(&mut self) {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("reduction").entered();
    let heap = &self.heap;
    let queue = &mut self.queue;
    let max_depth = heap.max_depth();
    let first_leaf = 1u32 << max_depth;

    queue.dispatch(prepass_word_count(max_depth), |word| {
      let mut store = heap;
      reduce_prepass_word(&mut store, first_leaf + word * LEAF_MARKERS_PER_FOLD);
    });
    queue.barrier();

    for depth in (0..max_depth - BIT_PARALLEL_LEVELS).rev() {
      let first = 1u32 << depth;
      queue.dispatch(first, |offset| {
        let mut store = heap;
        reduce_node(&mut store, Node::new(first + offset, depth));
      });
      queue.barrier();
    }
  }

  /// Single-invocation kernel writing the next frame's indirect buffer.
  fn derive_indirect(&mut self) {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("indirect").entered();
    let heap = &self.heap;
    let indirect = &self.indirect;
    self.queue.dispatch(1, |_| {
      indirect.write(&IndirectArgs::from_leaf_count(ops::leaf_count(&heap)));
    });
    self.queue.barrier();
  }

  /// Corners of every leaf, three per leaf, in leaf order.
  pub fn vertex_buffer(&self) -> Vec<Vec2> {
    let mut vertices = Vec::new();
    self.write_vertex_buffer(&mut vertices);
    vertices
  }

  /// Refill `vertices` with one parallel invocation per leaf.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "parallel::vertex_buffer"))]
  pub fn write_vertex_buffer(&self, vertices: &mut Vec<Vec2>) {
    let TessellationConfig { winding, root, .. } = self.config;
    let store = &self.heap;
    vertices.clear();
    vertices.resize(self.indirect.read().draw.vertex_count as usize, Vec2::ZERO);
    vertices
      .par_chunks_mut(3)
      .enumerate()
      .for_each(|(leaf_index, triangle)| {
        let leaf = ops::leaf_index_to_node(&store, leaf_index as u32);
        let corners = corners_from_node(leaf, &root, winding);
        triangle.copy_from_slice(&corners.wound_f32(leaf.depth, winding));
      });
  }

  /// Leaf under `point`, or [`Node::NULL`] outside the root triangle.
  pub fn node_from_point(&self, point: DVec2) -> Node {
    node_from_point(&&self.heap, point, &self.config.root, self.config.winding)
  }

  /// Same-depth neighbours of `node` under this instance's convention.
  pub fn calculate_same_depth_neighbourhood(&self, node: Node) -> Result<SameDepthNeighbourhood> {
    let max_depth = self.config.max_depth;
    if !node.is_valid(max_depth) {
      return Err(CbtError::InvalidNode {
        heap_index: node.heap_index,
        depth: node.depth,
        max_depth,
      });
    }
    Ok(leb::calculate_same_depth_neighbourhood(node, self.config.winding))
  }

  /// Copy of the packed heap words.
  pub fn heap(&self) -> Vec<u32> {
    self.heap.snapshot()
  }

  /// Upload packed words and rederive the indirect buffer.
  pub fn replace_heap(&mut self, words: &[u32]) -> Result<()> {
    if let Err(err) = self.heap.upload(words) {
      #[cfg(feature = "tracing")]
      tracing::warn!(%err, "rejected heap upload");
      return Err(err);
    }
    self.derive_indirect();
    #[cfg(feature = "tracing")]
    tracing::debug!(leaf_count = self.leaf_count(), "uploaded heap");
    Ok(())
  }
}

#[cfg(test)]
#[path = "mirror_test.rs"]
mod mirror_test;
