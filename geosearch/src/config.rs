//! Configuration for [`GeoTree`].
//!
//! [`TreeConfig`] holds every tunable of a tree and can be deserialized from
//! any serde format; missing fields take their defaults. [`GeoTreeBuilder`]
//! offers the same settings as a fluent API.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::geo_tree::geo_constants::{DEFAULT_LEAF_CAPACITY, DEFAULT_SEED, MIN_LEAF_CAPACITY};
use crate::geo_tree::{CollapsePolicy, GeoError, GeoResult, GeoTree, SplitPolicy};
use crate::geometry::{AxisCycle, Locatable};

/// Settings of a single tree.
///
/// # Examples
///
/// ```rust
/// use geosearch::TreeConfig;
///
/// let config: TreeConfig = serde_json::from_str(r#"{ "leaf_capacity": 4 }"#).unwrap();
/// assert_eq!(config.leaf_capacity, 4);
/// assert_eq!(config.seed, TreeConfig::default().seed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum number of objects per leaf
    pub leaf_capacity: usize,
    pub split_policy: SplitPolicy,
    pub axis_cycle: AxisCycle,
    pub collapse_policy: CollapsePolicy,
    /// Seed of the random source used by [`SplitPolicy::RandomMember`]
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
            split_policy: SplitPolicy::default(),
            axis_cycle: AxisCycle::default(),
            collapse_policy: CollapsePolicy::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl TreeConfig {
    /// Checks that the settings describe a usable tree.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidConfiguration`] if the leaf capacity is zero.
    pub fn validate(&self) -> GeoResult<()> {
        if self.leaf_capacity < MIN_LEAF_CAPACITY {
            log::error!("Leaf capacity must be at least {}", MIN_LEAF_CAPACITY);
            return Err(GeoError::InvalidConfiguration(format!(
                "leaf capacity must be at least {}, got {}",
                MIN_LEAF_CAPACITY, self.leaf_capacity
            )));
        }
        Ok(())
    }
}

/// Builder for creating and configuring a [`GeoTree`].
///
/// The first invalid setting is captured and returned by [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use geosearch::{CollapsePolicy, GeoTree, Point3};
///
/// # fn main() -> Result<(), geosearch::GeoError> {
/// let mut tree: GeoTree<'_, Point3> = GeoTree::builder()
///     .leaf_capacity(4)
///     .collapse_policy(CollapsePolicy::PromoteLeafSibling)
///     .seed(42)
///     .build()?;
///
/// let p = Point3::new(1.0, 2.0, 3.0);
/// tree.add(&p)?;
/// assert_eq!(tree.size(), 1);
/// # Ok(())
/// # }
/// ```
pub struct GeoTreeBuilder<T> {
    error: Option<GeoError>,
    config: TreeConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> GeoTreeBuilder<T> {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::from_config(TreeConfig::default())
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: TreeConfig) -> Self {
        GeoTreeBuilder {
            error: None,
            config,
            _marker: PhantomData,
        }
    }

    /// Sets the maximum number of objects per leaf; must be at least 1.
    pub fn leaf_capacity(mut self, leaf_capacity: usize) -> Self {
        if self.error.is_none() {
            let candidate = TreeConfig {
                leaf_capacity,
                ..self.config.clone()
            };
            match candidate.validate() {
                Ok(()) => self.config = candidate,
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    pub fn split_policy(mut self, split_policy: SplitPolicy) -> Self {
        self.config.split_policy = split_policy;
        self
    }

    pub fn axis_cycle(mut self, axis_cycle: AxisCycle) -> Self {
        self.config.axis_cycle = axis_cycle;
        self
    }

    pub fn collapse_policy(mut self, collapse_policy: CollapsePolicy) -> Self {
        self.config.collapse_policy = collapse_policy;
        self
    }

    /// Seeds the tree's random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Builds an empty tree.
    ///
    /// # Errors
    ///
    /// Returns the first error captured by a setter, or a validation error.
    pub fn build<'a>(self) -> GeoResult<GeoTree<'a, T>>
    where
        T: Locatable,
    {
        if let Some(e) = self.error {
            return Err(e);
        }
        GeoTree::with_config(self.config)
    }
}

impl<T> Default for GeoTreeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for GeoTreeBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoTreeBuilder")
            .field("error", &self.error)
            .field("config", &self.config)
            .finish()
    }
}
