//! Longest-edge bisection on top of the concurrent binary tree.
//!
//! # Module Structure
//!
//! - [`neighbourhood`]: same-depth neighbours from a node's address
//! - [`corners`]: triangle corners per node and point -> leaf lookup
//! - [`bisection`]: conforming split/merge and diamond parents

pub mod bisection;
pub mod corners;
pub mod neighbourhood;

// Re-exports
pub use bisection::{decode_diamond_parent, merge_node_conforming, split_node_conforming, DiamondParent};
pub use corners::{corners_from_node, node_from_point, Corners, RootTriangle};
pub use neighbourhood::{calculate_same_depth_neighbourhood, edge_neighbour, SameDepthNeighbourhood, WindingConvention};
