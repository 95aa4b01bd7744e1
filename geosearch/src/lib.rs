//! # GeoSearch - Mutable 3D Spatial Index
//!
//! This crate provides a k-d tree over objects that expose a fixed location in
//! three-dimensional space. Objects are borrowed, not copied, and can be added
//! and removed at any time.
//!
//! ## Features
//!
//! - **Bucketed Leaves**: Leaves hold several objects and split when they overflow
//! - **Radius Search**: All objects within a distance of a query point
//! - **Nearest Search**: The single closest object within a bound
//! - **Deterministic**: Seeded split selection, reproducible trees
//! - **Pluggable Compaction**: Removal-time collapse is a configurable policy
//! - **Diagnostics**: Text dumps, statistics and integrity checks
//!
//! ## Quick Start
//!
//! ```rust
//! use geosearch::{GeoTree, Locatable, Point3};
//!
//! struct Station {
//!     name: &'static str,
//!     position: Point3,
//! }
//!
//! impl Locatable for Station {
//!     fn location(&self) -> Point3 {
//!         self.position
//!     }
//! }
//!
//! # fn main() -> Result<(), geosearch::GeoError> {
//! let stations = vec![
//!     Station { name: "north", position: Point3::new(1.0, 10.0, 0.0) },
//!     Station { name: "south", position: Point3::new(-1.0, -10.0, 0.0) },
//!     Station { name: "deep", position: Point3::new(0.0, 0.0, -3.0) },
//! ];
//!
//! let mut tree = GeoTree::builder().leaf_capacity(2).build()?;
//! for station in &stations {
//!     tree.add(station)?;
//! }
//!
//! let nearest = tree.find_nearest(&Point3::origin(), 20.0).unwrap();
//! assert_eq!(nearest.object().name, "deep");
//!
//! let within = tree.find(&Point3::origin(), 11.0);
//! assert_eq!(within.len(), 3);
//!
//! assert!(tree.remove(&stations[0]));
//! assert_eq!(tree.size(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod geo_tree;
pub mod geometry;
pub mod search_result;
pub mod spatial_index;

pub use config::{GeoTreeBuilder, TreeConfig};
pub use geo_tree::{
    CollapsePolicy, GeoError, GeoResult, GeoTree, IntegrityReport, NodeId, SplitPolicy, TreeStats,
};
pub use geometry::{Axis, AxisCycle, Locatable, Point3};
pub use search_result::SearchResult;
pub use spatial_index::SpatialIndex;
