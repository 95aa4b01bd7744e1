//! Leaf splitting.
//!
//! When an insertion reaches a full leaf, the leaf turns into an internal node
//! in place. The bisector is picked from the coordinates of the leaf's members
//! plus the incoming object on the axis for the leaf's depth.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::geo_node::GeoNode;
use super::geo_types::{GeoError, GeoResult, NodeIdGenerator};
use crate::geometry::{Axis, AxisCycle, Locatable, Point3};

/// How a splitting leaf picks its bisector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Median coordinate of the population.
    #[default]
    Median,
    /// Coordinate of a member drawn from the tree's seeded random source.
    RandomMember,
}

/// Picks bisectors and performs splits for one tree.
#[derive(Debug, Clone)]
pub(crate) struct Splitter {
    policy: SplitPolicy,
    axis_cycle: AxisCycle,
    rng: StdRng,
}

impl Splitter {
    pub(crate) fn new(policy: SplitPolicy, axis_cycle: AxisCycle, seed: u64) -> Self {
        Self {
            policy,
            axis_cycle,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn axis_cycle(&self) -> AxisCycle {
        self.axis_cycle
    }

    /// Chooses a bisector from `values` that leaves at least one value on
    /// each side.
    ///
    /// If no value lies strictly below the policy's pick, the next distinct
    /// greater value is used instead. Fails only when every value is equal,
    /// in which case the random source is not advanced.
    fn choose_bisector(&mut self, values: &mut [f64], axis: Axis, depth: usize) -> GeoResult<f64> {
        values.sort_by(|a, b| a.total_cmp(b));

        let (lowest, highest) = (values[0], values[values.len() - 1]);
        if lowest == highest {
            log::error!(
                "Multiple points had identical coordinates ({}={}) at depth {}",
                axis,
                lowest,
                depth
            );
            return Err(GeoError::DegenerateSplit {
                axis,
                value: lowest,
                depth,
                population: values.len(),
            });
        }

        let candidate = match self.policy {
            SplitPolicy::Median => values[values.len() / 2],
            SplitPolicy::RandomMember => values[self.rng.gen_range(0..values.len())],
        };
        if lowest < candidate {
            return Ok(candidate);
        }

        // At least two distinct values, so a greater one exists
        let next = values
            .iter()
            .copied()
            .find(|v| *v > candidate)
            .unwrap_or(highest);
        log::debug!(
            "bisector {}={} would leave the left side empty, using {}",
            axis,
            candidate,
            next
        );
        Ok(next)
    }

    /// Splits the full leaf `node` at `depth`, turning it into an internal
    /// node with two fresh leaves. `incoming` is the location of the object
    /// whose insertion triggered the split.
    ///
    /// On error the node is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a leaf.
    pub(crate) fn split<'a, T: Locatable>(
        &mut self,
        node: &mut GeoNode<'a, T>,
        incoming: &Point3,
        depth: usize,
        ids: &mut NodeIdGenerator,
    ) -> GeoResult<()> {
        let axis = self.axis_cycle.axis_for_depth(depth);

        let (id, bucket, capacity) = match node {
            GeoNode::Leaf {
                id,
                bucket,
                capacity,
            } => (*id, bucket, *capacity),
            GeoNode::Internal { id, .. } => panic!("split called on internal node {}", id),
        };

        let mut values: Vec<f64> = bucket
            .iter()
            .map(|object| axis.coordinate(&object.location()))
            .chain(std::iter::once(axis.coordinate(incoming)))
            .collect();
        let bisector = self.choose_bisector(&mut values, axis, depth)?;
        log::debug!("splitting leaf {} at depth {} on {}={}", id, depth, axis, bisector);

        let mut left = GeoNode::new_leaf(ids.next_id(), capacity);
        let mut right = GeoNode::new_leaf(ids.next_id(), capacity);
        for object in std::mem::take(bucket) {
            if axis.coordinate(&object.location()) < bisector {
                left.add_to_leaf(object);
            } else {
                right.add_to_leaf(object);
            }
        }
        log::trace!(
            "leaf {} -> left {} ({} objects), right {} ({} objects)",
            id,
            left.id(),
            left.population(),
            right.id(),
            right.population()
        );

        *node = GeoNode::Internal {
            id,
            split_value: bisector,
            left: Box::new(left),
            right: Box::new(right),
        };
        Ok(())
    }
}
