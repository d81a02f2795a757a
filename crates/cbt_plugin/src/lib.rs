//! cbt_plugin - Engine independent concurrent binary tree tessellation
//!
//! This crate maintains an adaptive, crack-free subdivision of a triangle by
//! longest-edge bisection. The subdivision lives in a concurrent binary
//! tree: a bit-packed implicit heap whose deepest level marks leaves and
//! whose coarser levels hold leaf counts, refreshed by a sum reduction.
//!
//! # Features
//!
//! - **Packed heap**: one variable-width field per node, `2^(D+2)` bits total
//! - **Bit-parallel reduction**: 32 leaf markers folded per word for the
//!   deepest five levels
//! - **Conforming bisection**: split/merge with same-depth neighbour
//!   propagation, so neighbouring leaves never differ by more than one level
//! - **Refinement driver**: alternating split and merge passes around a
//!   target point or any custom policy
//! - **Parallel mirror**: the same state machine as rayon kernels with
//!   explicit barriers and an indirect dispatch buffer
//!
//! # Example
//!
//! ```ignore
//! use cbt_plugin::{TessellationConfig, Tessellator};
//! use glam::DVec2;
//!
//! let mut tess = Tessellator::new(TessellationConfig::default().with_max_depth(18))?;
//!
//! // Once per frame
//! tess.refine_around_point(DVec2::new(0.3, 0.2));
//! let vertices = tess.vertex_buffer();
//!
//! println!("{} leaves, {} vertices", tess.leaf_count(), vertices.len());
//! ```

pub mod bitfield;
pub mod constants;
pub mod error;

// Re-export commonly used items
pub use bitfield::{AccessPlan, PackedBitArray};
pub use constants::{MAX_MAX_DEPTH, MAX_PARALLEL_MAX_DEPTH, MIN_MAX_DEPTH, MIN_PARALLEL_MAX_DEPTH, WORKGROUP_SIZE};
pub use error::{CbtError, Result};

// Concurrent binary tree
pub mod cbt;
pub use cbt::{ConcurrentBinaryTree, Node, NodeStore, PackedHeap, PackedStore, ReductionStrategy};

// Longest-edge bisection
pub mod leb;
pub use leb::{Corners, DiamondParent, RootTriangle, SameDepthNeighbourhood, WindingConvention};

// Refinement driver
pub mod refinement;
pub use refinement::{
  DistanceLod, PassKind, PointTarget, RefinementPolicy, RefinementStats, TessellationConfig, Tessellator,
};

// Data-parallel mirror
pub mod parallel;
pub use parallel::{AtomicHeap, IndirectArgs, KernelQueue, ParallelTessellator};

// Test utilities
#[cfg(test)]
pub mod test_utils;
