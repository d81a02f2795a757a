//! Data-parallel mirror of the refinement driver.
//!
//! The same state machine as [`crate::refinement`], expressed as kernels
//! over leaf and node indices with explicit barriers between phases. Runs
//! on the rayon pool.
//!
//! # Module Structure
//!
//! - [`atomic_heap`]: `AtomicHeap` - packed heap with atomic words
//! - [`dispatch`]: `KernelQueue`, `IndirectArgs`, `IndirectBuffer`
//! - [`mirror`]: `ParallelTessellator` - one frame per refinement call

pub mod atomic_heap;
pub mod dispatch;
pub mod mirror;


// Re-exports
pub use atomic_heap::AtomicHeap;
pub use dispatch::{DispatchIndirectCommand, DrawArraysIndirectCommand, IndirectArgs, IndirectBuffer, KernelQueue, QueueStats};
pub use mirror::ParallelTessellator;
