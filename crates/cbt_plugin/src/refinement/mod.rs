//! Refinement driver: alternating split/merge passes over the leaves.
//!
//! # Module Structure
//!
//! - [`config`]: `TessellationConfig` - depth, winding and root triangle
//! - [`policy`]: `RefinementPolicy` with `PointTarget` and `DistanceLod`
//! - [`update`]: per-leaf update shared with the parallel mirror
//! - [`stats`]: `RefinementStats`
//! - [`tessellator`]: `Tessellator` - sequential driver and vertex output

pub mod config;
pub mod policy;
pub mod stats;
pub mod tessellator;
pub mod update;

// Re-exports
pub use config::TessellationConfig;
pub use policy::{DistanceLod, PassKind, PointTarget, RefinementPolicy};
pub use stats::RefinementStats;
pub use tessellator::Tessellator;
pub use update::{update_leaf, LeafUpdate};
