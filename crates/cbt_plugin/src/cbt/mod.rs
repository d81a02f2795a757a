//! Concurrent binary tree: a bit-packed implicit binary heap of leaf counts.
//!
//! The tree is never stored as nodes. Leaves are 1-bit markers in the
//! deepest level; every coarser level holds per-node leaf counts that a sum
//! reduction recomputes after each batch of edits.
//!
//! # Module Structure
//!
//! - [`node`]: `Node` - immutable (heap index, depth) address
//! - [`store`]: node addressing and the `NodeStore`/`PackedStore` seams
//! - [`heap`]: `PackedHeap` - word storage with header
//! - [`reduction`]: naive and bit-parallel sum reduction
//! - [`ops`]: split/merge markers and leaf index translation
//! - [`tree`]: `ConcurrentBinaryTree` - checked public API

pub mod heap;
pub mod node;
pub mod ops;
pub mod reduction;
pub mod store;
pub mod tree;

// Re-exports
pub use heap::PackedHeap;
pub use node::Node;
pub use store::{bit_index_of, field_width, NodeStore, PackedStore};
pub use tree::{ConcurrentBinaryTree, ReductionStrategy};
