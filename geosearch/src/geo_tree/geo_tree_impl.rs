//! GeoTree implementation.

use std::fmt::{self, Debug};

use super::geo_node::{GeoNode, Side};
use super::geo_types::{
    GeoError, GeoResult, IntegrityReport, NodeIdGenerator, TreeStats,
};
use super::split::Splitter;
use crate::config::{GeoTreeBuilder, TreeConfig};
use crate::geometry::{Axis, AxisCycle, Locatable, Point3};
use crate::search_result::SearchResult;
use crate::spatial_index::SpatialIndex;

/// A mutable k-d tree over borrowed objects with 3D locations.
///
/// Leaves hold up to `leaf_capacity` objects. A leaf that overflows splits in
/// place on the axis for its depth (x, y, z, x, ... by default). Objects are
/// borrowed for `'a` and compared by identity on removal.
///
/// # Examples
///
/// ```rust
/// use geosearch::{GeoTree, Point3};
///
/// # fn main() -> Result<(), geosearch::GeoError> {
/// let points: Vec<Point3> = (0..10)
///     .map(|i| Point3::new(i as f64, i as f64, i as f64))
///     .collect();
/// let mut tree = GeoTree::builder().leaf_capacity(4).build()?;
/// for p in &points {
///     tree.add(p)?;
/// }
///
/// let near = tree.find(&Point3::new(4.0, 4.0, 4.0), 1.8);
/// assert_eq!(near.len(), 3);
///
/// let nearest = tree.find_nearest(&Point3::new(8.9, 8.9, 8.9), 5.0).unwrap();
/// assert_eq!(nearest.object().x, 9.0);
/// # Ok(())
/// # }
/// ```
pub struct GeoTree<'a, T> {
    root: GeoNode<'a, T>,
    size: usize,
    config: TreeConfig,
    splitter: Splitter,
    node_ids: NodeIdGenerator,
}

/// Outcome of a removal below some node.
enum Removal {
    NotFound,
    Removed,
    /// Removed, and the leaf that held the object is now empty.
    EmptiedLeaf,
}

/// An ancestor's bisector as seen from one of its subtrees.
#[derive(Clone, Copy)]
struct Bound {
    axis: Axis,
    split_value: f64,
    side: Side,
}

impl Bound {
    fn admits(&self, location: &Point3) -> bool {
        let coordinate = self.axis.coordinate(location);
        match self.side {
            Side::Left => coordinate < self.split_value,
            Side::Right => coordinate >= self.split_value,
        }
    }
}

impl<'a, T: Locatable> GeoTree<'a, T> {
    /// Creates an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(TreeConfig::default())
    }

    /// Creates an empty tree with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidConfiguration`] if the configuration does
    /// not validate.
    pub fn with_config(config: TreeConfig) -> GeoResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Returns a builder for configuring a new tree.
    pub fn builder() -> GeoTreeBuilder<T> {
        GeoTreeBuilder::new()
    }

    fn from_valid_config(config: TreeConfig) -> Self {
        let mut node_ids = NodeIdGenerator::default();
        let root = GeoNode::new_leaf(node_ids.next_id(), config.leaf_capacity);
        let splitter = Splitter::new(config.split_policy, config.axis_cycle, config.seed);
        GeoTree {
            root,
            size: 0,
            config,
            splitter,
            node_ids,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of stored objects.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Adds an object to the tree.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidLocation`] if the location has a NaN or infinite
    ///   coordinate.
    /// - [`GeoError::DegenerateSplit`] if a full leaf must split but all its
    ///   objects and the new one share the coordinate on the split axis.
    ///
    /// The tree is unchanged when an error is returned.
    pub fn add(&mut self, object: &'a T) -> GeoResult<()> {
        let location = object.location();
        if !location.is_finite() {
            log::error!("Cannot index object at non-finite location {}", location);
            return Err(GeoError::InvalidLocation(location));
        }

        log::trace!("add: {}", location);
        Self::insert_recursive(
            &mut self.root,
            object,
            &location,
            0,
            &mut self.splitter,
            &mut self.node_ids,
        )?;
        self.size += 1;
        self.log_dump("add");
        Ok(())
    }

    /// Descends to the leaf for `location`, splitting full leaves on the way.
    fn insert_recursive(
        node: &mut GeoNode<'a, T>,
        object: &'a T,
        location: &Point3,
        depth: usize,
        splitter: &mut Splitter,
        ids: &mut NodeIdGenerator,
    ) -> GeoResult<()> {
        if node.is_leaf() {
            if node.is_full() {
                splitter.split(node, location, depth, ids)?;
                // Same depth again; the node is internal now
                return Self::insert_recursive(node, object, location, depth, splitter, ids);
            }
            log::trace!("adding to leaf {} at depth {}", node.id(), depth);
            node.add_to_leaf(object);
            return Ok(());
        }

        let axis = splitter.axis_cycle().axis_for_depth(depth);
        let side = node.side_for(axis.coordinate(location));
        log::trace!("depth {}: descending {:?} of {}", depth, side, node.id());
        Self::insert_recursive(node.child_mut(side), object, location, depth + 1, splitter, ids)
    }

    /// Removes an object, matched by identity.
    ///
    /// Returns false if the object is not stored under its location. When the
    /// removal empties a leaf that has a parent, the configured
    /// [`CollapsePolicy`](crate::CollapsePolicy) decides what happens to the
    /// parent.
    pub fn remove(&mut self, object: &T) -> bool {
        let location = object.location();
        let outcome = Self::remove_recursive(
            &mut self.root,
            object,
            &location,
            0,
            self.splitter.axis_cycle(),
            &self.config,
        );

        match outcome {
            Removal::NotFound => {
                log::trace!("remove: {} not found", location);
                false
            }
            Removal::Removed | Removal::EmptiedLeaf => {
                self.size -= 1;
                self.log_dump("remove");
                true
            }
        }
    }

    fn remove_recursive(
        node: &mut GeoNode<'a, T>,
        object: &T,
        location: &Point3,
        depth: usize,
        axis_cycle: AxisCycle,
        config: &TreeConfig,
    ) -> Removal {
        if node.is_leaf() {
            let Some(index) = node.position_of(object) else {
                return Removal::NotFound;
            };
            node.remove_from_leaf(index);
            log::trace!("removed {}, now {}", location, node.describe());
            return if node.population() == 0 {
                Removal::EmptiedLeaf
            } else {
                Removal::Removed
            };
        }

        let axis = axis_cycle.axis_for_depth(depth);
        let side = node.side_for(axis.coordinate(location));
        let outcome = Self::remove_recursive(
            node.child_mut(side),
            object,
            location,
            depth + 1,
            axis_cycle,
            config,
        );

        match outcome {
            Removal::EmptiedLeaf => {
                config.collapse_policy.apply(node, side);
                Removal::Removed
            }
            other => other,
        }
    }

    /// Finds all objects within `radius` of `query`.
    ///
    /// Distances are inclusive. Results come in no particular order.
    pub fn find(&self, query: &Point3, radius: f64) -> Vec<SearchResult<'a, T>> {
        let mut results = Vec::new();
        self.find_recursive(&self.root, query, radius * radius, 0, &mut results);
        log::trace!("find {} r={}: {} results", query, radius, results.len());
        results
    }

    fn find_recursive(
        &self,
        node: &GeoNode<'a, T>,
        query: &Point3,
        threshold: f64,
        depth: usize,
        results: &mut Vec<SearchResult<'a, T>>,
    ) {
        match node {
            GeoNode::Leaf { bucket, .. } => {
                for &object in bucket {
                    let distance = query.distance_squared(&object.location());
                    if distance <= threshold {
                        results.push(SearchResult::new(object, distance));
                    }
                }
            }
            GeoNode::Internal {
                split_value,
                left,
                right,
                ..
            } => {
                let axis = self.splitter.axis_cycle().axis_for_depth(depth);
                let delta = axis.coordinate(query) - split_value;

                // The query sphere crosses the splitting plane
                if delta * delta <= threshold {
                    self.find_recursive(left, query, threshold, depth + 1, results);
                    self.find_recursive(right, query, threshold, depth + 1, results);
                } else if delta < 0.0 {
                    self.find_recursive(left, query, threshold, depth + 1, results);
                } else {
                    self.find_recursive(right, query, threshold, depth + 1, results);
                }
            }
        }
    }

    /// Finds the object closest to `query` within `bound` (inclusive).
    ///
    /// Among objects at the same distance, the first one reached wins.
    pub fn find_nearest(&self, query: &Point3, bound: f64) -> Option<SearchResult<'a, T>> {
        let mut best = None;
        let mut best_distance = bound * bound;
        self.nearest_recursive(&self.root, query, 0, &mut best, &mut best_distance);
        best
    }

    fn nearest_recursive(
        &self,
        node: &GeoNode<'a, T>,
        query: &Point3,
        depth: usize,
        best: &mut Option<SearchResult<'a, T>>,
        best_distance: &mut f64,
    ) {
        match node {
            GeoNode::Leaf { bucket, .. } => {
                for &object in bucket {
                    let distance = query.distance_squared(&object.location());
                    let closer = match best {
                        None => distance <= *best_distance,
                        Some(_) => distance < *best_distance,
                    };
                    if closer {
                        *best = Some(SearchResult::new(object, distance));
                        *best_distance = distance;
                    }
                }
            }
            GeoNode::Internal {
                split_value,
                left,
                right,
                ..
            } => {
                let axis = self.splitter.axis_cycle().axis_for_depth(depth);
                let delta = axis.coordinate(query) - split_value;
                let (near, far) = if delta < 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };

                self.nearest_recursive(near, query, depth + 1, best, best_distance);
                if delta * delta <= *best_distance {
                    self.nearest_recursive(far, query, depth + 1, best, best_distance);
                }
            }
        }
    }

    /// Removes every object. Node ids and the random source keep counting.
    pub fn clear(&mut self) {
        self.root = GeoNode::new_leaf(self.node_ids.next_id(), self.config.leaf_capacity);
        self.size = 0;
    }

    /// Depth-indented dump of the whole tree, one line per node.
    pub fn dump(&self) -> String {
        self.root.dump_subtree(self.splitter.axis_cycle())
    }

    fn log_dump(&self, operation: &str) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("tree after {}:\n{}", operation, self.dump());
        }
    }

    /// Collects structural statistics.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            size: self.size,
            ..TreeStats::default()
        };
        Self::collect_stats(&self.root, 1, &mut stats);
        stats
    }

    fn collect_stats(node: &GeoNode<'a, T>, level: usize, stats: &mut TreeStats) {
        stats.height = stats.height.max(level);
        match node {
            GeoNode::Leaf { bucket, .. } => {
                stats.leaf_count += 1;
                if bucket.is_empty() {
                    stats.empty_leaf_count += 1;
                }
            }
            GeoNode::Internal { left, right, .. } => {
                stats.internal_count += 1;
                Self::collect_stats(left, level + 1, stats);
                Self::collect_stats(right, level + 1, stats);
            }
        }
    }

    /// Walks the whole tree and checks its structural invariants.
    ///
    /// Reports leaves over capacity, objects lying on the wrong side of an
    /// ancestor's bisector, and a recorded size that differs from the number
    /// of stored objects.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();
        report.recorded_size = self.size;
        let mut bounds = Vec::new();
        self.check_recursive(&self.root, 0, &mut bounds, &mut report);

        if report.counted_objects != report.recorded_size {
            report.errors.push(format!(
                "size is {} but leaves hold {} objects",
                report.recorded_size, report.counted_objects
            ));
        }
        if !report.is_valid() {
            log::warn!("integrity check found {} problems", report.errors.len());
        }
        report
    }

    fn check_recursive(
        &self,
        node: &GeoNode<'a, T>,
        depth: usize,
        bounds: &mut Vec<Bound>,
        report: &mut IntegrityReport,
    ) {
        report.nodes_checked += 1;
        match node {
            GeoNode::Leaf {
                id,
                bucket,
                capacity,
            } => {
                report.counted_objects += bucket.len();
                if bucket.len() > *capacity {
                    report.capacity_violations.push(*id);
                    report.errors.push(format!(
                        "leaf {} holds {} objects, capacity is {}",
                        id,
                        bucket.len(),
                        capacity
                    ));
                }

                let misplaced = bucket
                    .iter()
                    .filter(|object| {
                        let location = object.location();
                        bounds.iter().any(|bound| !bound.admits(&location))
                    })
                    .count();
                if misplaced > 0 {
                    report.split_violations.push(*id);
                    report.errors.push(format!(
                        "leaf {} holds {} objects outside its ancestors' bisectors",
                        id, misplaced
                    ));
                }
            }
            GeoNode::Internal {
                split_value,
                left,
                right,
                ..
            } => {
                let axis = self.splitter.axis_cycle().axis_for_depth(depth);
                for (child, side) in [(left, Side::Left), (right, Side::Right)] {
                    bounds.push(Bound {
                        axis,
                        split_value: *split_value,
                        side,
                    });
                    self.check_recursive(child, depth + 1, bounds, report);
                    bounds.pop();
                }
            }
        }
    }
}

impl<T: Locatable> Default for GeoTree<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for GeoTree<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoTree")
            .field("size", &self.size)
            .field("config", &self.config)
            .field("root", &self.root.id())
            .finish()
    }
}

impl<'a, T: Locatable> SpatialIndex<'a, T> for GeoTree<'a, T> {
    fn add(&mut self, object: &'a T) -> GeoResult<()> {
        GeoTree::add(self, object)
    }

    fn remove(&mut self, object: &T) -> bool {
        GeoTree::remove(self, object)
    }

    fn find(&self, query: &Point3, radius: f64) -> Vec<SearchResult<'a, T>> {
        GeoTree::find(self, query, radius)
    }

    fn find_nearest(&self, query: &Point3, bound: f64) -> Option<SearchResult<'a, T>> {
        GeoTree::find_nearest(self, query, bound)
    }

    fn size(&self) -> usize {
        GeoTree::size(self)
    }
}
