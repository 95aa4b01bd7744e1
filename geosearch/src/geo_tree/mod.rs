//! In-memory k-d tree over 3D locations.
//!
//! The tree stores borrowed references to caller-owned objects. Each leaf
//! holds a bucket of at most `leaf_capacity` objects; an internal node splits
//! space with a plane orthogonal to the axis chosen by its depth:
//! - insertion descends to a leaf and splits it in place when it is full
//! - removal matches objects by identity and may collapse the parent of an
//!   emptied leaf, as decided by a [`CollapsePolicy`]
//! - radius and nearest queries prune subtrees whose half-space lies beyond
//!   the current search distance

pub mod geo_constants;
pub mod geo_types;
mod collapse;
mod geo_node;
mod geo_tree_impl;
mod split;

pub use collapse::CollapsePolicy;
pub use geo_tree_impl::GeoTree;
pub use geo_types::{GeoError, GeoResult, IntegrityReport, NodeId, TreeStats};
pub use split::SplitPolicy;
