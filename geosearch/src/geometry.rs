//! Geometry types for the 3D spatial index.
//!
//! This module provides the small set of geometric building blocks the tree
//! needs:
//! - [`Point3`], a 3D location
//! - [`Axis`] and [`AxisCycle`], which map a tree depth to the coordinate a
//!   node splits on
//! - [`Locatable`], the capability every stored object must provide

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A 3D coordinate (x, y, z).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Creates a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a point at the origin.
    pub fn origin() -> Self {
        Self::default()
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns true if no coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3::new(x, y, z)
    }
}

/// One of the three spatial axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Reads this axis' component of `point`.
    pub fn coordinate(self, point: &Point3) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
            Axis::Z => point.z,
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// How split axes cycle as the tree gets deeper.
///
/// Insertion, removal and both searches all go through the same cycle, so
/// either variant yields a consistent tree. They differ only in split quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisCycle {
    /// x, y, z, x, y, z, ...
    #[default]
    Xyz,
    /// x, y, x, x, y, x, ... Depth 2 reads x again and z is never split on.
    Xyx,
}

impl AxisCycle {
    /// Returns the axis nodes at `depth` split on.
    pub fn axis_for_depth(self, depth: usize) -> Axis {
        match (self, depth % 3) {
            (_, 0) => Axis::X,
            (_, 1) => Axis::Y,
            (AxisCycle::Xyz, _) => Axis::Z,
            (AxisCycle::Xyx, _) => Axis::X,
        }
    }
}

/// Capability required of every object stored in a [`GeoTree`](crate::GeoTree).
///
/// The returned location must not change while the object is indexed; the
/// tree routes removals by it.
pub trait Locatable {
    /// The object's fixed location.
    fn location(&self) -> Point3;
}

impl Locatable for Point3 {
    fn location(&self) -> Point3 {
        *self
    }
}

impl<L: Locatable + ?Sized> Locatable for Box<L> {
    fn location(&self) -> Point3 {
        (**self).location()
    }
}
