//! Query results.

use std::fmt::{self, Debug, Display};

use crate::geometry::Locatable;

/// A stored object matched by a query, with its squared distance to the query
/// point.
///
/// The object is borrowed from the caller's storage, not from the tree, so a
/// result may outlive the borrow of the tree that produced it.
pub struct SearchResult<'a, T> {
    object: &'a T,
    squared_distance: f64,
}

impl<'a, T> SearchResult<'a, T> {
    /// Creates a result. Other [`SpatialIndex`](crate::SpatialIndex)
    /// implementations use this to report their matches.
    pub fn new(object: &'a T, squared_distance: f64) -> Self {
        Self {
            object,
            squared_distance,
        }
    }

    /// The matched object.
    pub fn object(&self) -> &'a T {
        self.object
    }

    pub fn squared_distance(&self) -> f64 {
        self.squared_distance
    }

    /// Euclidean distance to the query point.
    pub fn distance(&self) -> f64 {
        self.squared_distance.sqrt()
    }
}

impl<T> Clone for SearchResult<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SearchResult<'_, T> {}

impl<T: Debug> Debug for SearchResult<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("object", self.object)
            .field("squared_distance", &self.squared_distance)
            .finish()
    }
}

impl<T: Locatable> Display for SearchResult<'_, T> {
    /// Formats as `<location dist:N>` with `N` the distance truncated to an
    /// integer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} dist:{}>",
            self.object.location(),
            self.distance() as i64
        )
    }
}
