//! Core types shared by the tree implementation.
//!
//! This module defines:
//! - Error types and result types
//! - Node identifiers and their per-tree generator
//! - Statistics and integrity report structures

use std::fmt::{self, Display};
use thiserror::Error;

use crate::geometry::{Axis, Point3};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial index operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Every object in an overflowing leaf shares the same coordinate on the
    /// split axis, so no bisector can separate them.
    #[error(
        "cannot split leaf at depth {depth}: all {population} objects have {axis} = {value}; perturb the inputs"
    )]
    DegenerateSplit {
        axis: Axis,
        value: f64,
        depth: usize,
        population: usize,
    },

    #[error("Invalid location: {0}")]
    InvalidLocation(Point3),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for spatial index operations
pub type GeoResult<T> = Result<T, GeoError>;

// ============================================================================
// Node identity
// ============================================================================

/// Diagnostic identifier of a tree node, unique within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out node ids. Each tree owns one, so ids are reproducible per tree.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeIdGenerator {
    next: u64,
}

impl NodeIdGenerator {
    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Structural statistics of a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of stored objects
    pub size: usize,
    pub leaf_count: usize,
    pub internal_count: usize,
    /// Leaves left empty by removals
    pub empty_leaf_count: usize,
    /// Number of levels; a lone root leaf has height 1
    pub height: usize,
}

// ============================================================================
// Integrity checking
// ============================================================================

/// Result of [`GeoTree::check_integrity`](crate::GeoTree::check_integrity)
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    /// Total nodes visited
    pub nodes_checked: usize,
    /// Leaves holding more objects than their capacity
    pub capacity_violations: Vec<NodeId>,
    /// Leaves holding objects on the wrong side of an ancestor's bisector
    pub split_violations: Vec<NodeId>,
    /// Objects counted in leaf buckets
    pub counted_objects: usize,
    /// Size recorded by the tree
    pub recorded_size: usize,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no violation of any kind was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
