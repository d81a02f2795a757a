//! Kernel dispatch with explicit barriers, and the indirect argument
//! buffer derived from the leaf count.
//!
//! A dispatch runs `count` invocations of a kernel on the rayon pool and
//! returns once all of them finished. Dispatches never overlap; a barrier
//! between them makes every write of the previous phase visible to the
//! next one.

use std::sync::atomic::{fence, AtomicU32, Ordering};

use rayon::prelude::*;

use crate::constants::WORKGROUP_SIZE;

/// Workgroup counts of an indirect compute dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchIndirectCommand {
  pub num_groups_x: u32,
  pub num_groups_y: u32,
  pub num_groups_z: u32,
}

/// Arguments of an indirect non-indexed draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawArraysIndirectCommand {
  pub vertex_count: u32,
  pub instance_count: u32,
  pub first_vertex: u32,
  pub first_instance: u32,
}

/// Indirect buffer contents for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndirectArgs {
  /// Size of the next update dispatch.
  pub dispatch: DispatchIndirectCommand,
  /// One triangle per leaf.
  pub draw: DrawArraysIndirectCommand,
}

impl IndirectArgs {
  /// Derive both commands from a leaf count.
  ///
  /// The dispatch is never empty: `max(1, ceil(leaf_count / WORKGROUP_SIZE))`.
  /// The vertex count saturates for counts no valid heap holds.
  pub const fn from_leaf_count(leaf_count: u32) -> Self {
    let groups = leaf_count.div_ceil(WORKGROUP_SIZE);
    Self {
      dispatch: DispatchIndirectCommand {
        num_groups_x: if groups == 0 { 1 } else { groups },
        num_groups_y: 1,
        num_groups_z: 1,
      },
      draw: DrawArraysIndirectCommand {
        vertex_count: leaf_count.saturating_mul(3),
        instance_count: 1,
        first_vertex: 0,
        first_instance: 0,
      },
    }
  }

  /// Invocations the dispatch command launches.
  #[inline]
  pub const fn invocation_count(&self) -> u32 {
    self.dispatch.num_groups_x * self.dispatch.num_groups_y * self.dispatch.num_groups_z * WORKGROUP_SIZE
  }
}

impl Default for IndirectArgs {
  fn default() -> Self {
    Self::from_leaf_count(1)
  }
}

/// Indirect argument buffer written by a kernel, read by the next dispatch.
///
/// Word layout: dispatch `x, y, z`, then draw `vertex_count,
/// instance_count, first_vertex, first_instance`.
#[derive(Debug)]
pub struct IndirectBuffer {
  words: [AtomicU32; 7],
}

impl IndirectBuffer {
  pub fn new(args: IndirectArgs) -> Self {
    let buffer = Self {
      words: Default::default(),
    };
    buffer.write(&args);
    buffer
  }

  pub fn write(&self, args: &IndirectArgs) {
    let values = [
      args.dispatch.num_groups_x,
      args.dispatch.num_groups_y,
      args.dispatch.num_groups_z,
      args.draw.vertex_count,
      args.draw.instance_count,
      args.draw.first_vertex,
      args.draw.first_instance,
    ];
    for (word, value) in self.words.iter().zip(values) {
      word.store(value, Ordering::Relaxed);
    }
  }

  pub fn read(&self) -> IndirectArgs {
    let [x, y, z, vertex_count, instance_count, first_vertex, first_instance] =
      self.words.each_ref().map(|word| word.load(Ordering::Relaxed));
    IndirectArgs {
      dispatch: DispatchIndirectCommand {
        num_groups_x: x,
        num_groups_y: y,
        num_groups_z: z,
      },
      draw: DrawArraysIndirectCommand {
        vertex_count,
        instance_count,
        first_vertex,
        first_instance,
      },
    }
  }
}

/// Counters of one queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
  pub dispatches: u64,
  pub invocations: u64,
  pub barriers: u64,
}

/// Sequence of kernel dispatches separated by barriers.
#[derive(Debug, Default)]
pub struct KernelQueue {
  stats: QueueStats,
}

impl KernelQueue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Run `kernel(id)` for every `id` in `0..count` and wait for all.
  pub fn dispatch<F>(&mut self, count: u32, kernel: F)
  where
    F: Fn(u32) + Sync + Send,
  {
    (0..count).into_par_iter().for_each(kernel);
    self.stats.dispatches += 1;
    self.stats.invocations += u64::from(count);
  }

  /// Dispatch sized by an indirect buffer. Kernels bound-check their id.
  pub fn dispatch_indirect<F>(&mut self, args: &IndirectArgs, kernel: F)
  where
    F: Fn(u32) + Sync + Send,
  {
    self.dispatch(args.invocation_count(), kernel);
  }

  /// Full memory barrier between two phases.
  pub fn barrier(&mut self) {
    fence(Ordering::SeqCst);
    self.stats.barriers += 1;
  }

  #[inline]
  pub fn stats(&self) -> QueueStats {
    self.stats
  }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
