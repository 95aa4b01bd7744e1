//! SpatialIndex trait definition.

use crate::geo_tree::GeoResult;
use crate::geometry::{Locatable, Point3};
use crate::search_result::SearchResult;

/// A mutable index of borrowed objects keyed by their 3D location.
///
/// [`GeoTree`](crate::GeoTree) is the main implementation. The trait lets
/// callers and tests swap in another index, such as a brute-force scan, behind
/// the same operations.
pub trait SpatialIndex<'a, T: Locatable> {
    /// Adds an object to the index.
    ///
    /// # Errors
    ///
    /// Implementations report input data they cannot index.
    fn add(&mut self, object: &'a T) -> GeoResult<()>;

    /// Removes an object, matched by identity. Returns false if it was not
    /// indexed.
    fn remove(&mut self, object: &T) -> bool;

    /// Finds all objects within `radius` of `query`, in no particular order.
    fn find(&self, query: &Point3, radius: f64) -> Vec<SearchResult<'a, T>>;

    /// Finds the object closest to `query` that lies within `bound`.
    fn find_nearest(&self, query: &Point3, bound: f64) -> Option<SearchResult<'a, T>>;

    /// Number of indexed objects.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
