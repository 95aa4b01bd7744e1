use geosearch::{
    GeoResult, GeoTree, Locatable, Point3, SearchResult, SpatialIndex, TreeConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::{self, Display};
use std::time::Instant;

/// Runs a test between a setup and a teardown step.
///
/// `after` runs even if `test` returns an error. Any error fails the test with
/// a panic naming the step that produced it.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> GeoResult<()>,
    B: Fn() -> GeoResult<TestContext>,
    A: Fn(TestContext) -> GeoResult<()>,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_result = test(ctx.clone());
    let after_result = after(ctx);
    log::debug!("test finished in {:?}", start_time.elapsed());

    if let Err(e) = test_result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

/// Objects and tree settings shared by one test.
///
/// Trees borrow their objects, so the context owns the markers and each test
/// builds its tree from them with [`TestContext::tree`].
#[derive(Clone)]
pub struct TestContext {
    markers: Vec<Marker>,
    config: TreeConfig,
}

impl TestContext {
    pub fn new(markers: Vec<Marker>, config: TreeConfig) -> Self {
        Self { markers, config }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Builds a tree holding every marker of the context.
    pub fn tree(&self) -> GeoResult<GeoTree<'_, Marker>> {
        let mut tree = GeoTree::with_config(self.config.clone())?;
        for marker in &self.markers {
            tree.add(marker)?;
        }
        Ok(tree)
    }

    /// A brute-force index holding every marker of the context.
    pub fn reference(&self) -> BruteForceIndex<'_, Marker> {
        let mut index = BruteForceIndex::new();
        for marker in &self.markers {
            index.objects.push(marker);
        }
        index
    }
}

/// A labelled object at a fixed location.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: usize,
    pub position: Point3,
}

impl Marker {
    pub fn new(id: usize, position: Point3) -> Self {
        Self { id, position }
    }
}

impl Locatable for Marker {
    fn location(&self) -> Point3 {
        self.position
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker {} at {}", self.id, self.position)
    }
}

/// Markers at integer coordinates in `[0, extent)` on each axis.
pub fn random_grid_markers(seed: u64, count: usize, extent: i32) -> Vec<Marker> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let position = Point3::new(
                f64::from(rng.gen_range(0..extent)),
                f64::from(rng.gen_range(0..extent)),
                f64::from(rng.gen_range(0..extent)),
            );
            Marker::new(id, position)
        })
        .collect()
}

/// Markers at continuous coordinates in `[0, extent)` on each axis.
pub fn random_markers(seed: u64, count: usize, extent: f64) -> Vec<Marker> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let position = Point3::new(
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
            );
            Marker::new(id, position)
        })
        .collect()
}

/// Query points drawn like [`random_markers`].
pub fn random_queries(seed: u64, count: usize, extent: f64) -> Vec<Point3> {
    random_markers(seed, count, extent)
        .into_iter()
        .map(|m| m.position)
        .collect()
}

pub fn create_test_context() -> GeoResult<TestContext> {
    create_test_context_with(TreeConfig::default(), random_markers(123, 1000, 1000.0))
}

pub fn create_test_context_with(config: TreeConfig, markers: Vec<Marker>) -> GeoResult<TestContext> {
    config.validate()?;
    log::debug!(
        "test context with {} markers, leaf capacity {}",
        markers.len(),
        config.leaf_capacity
    );
    Ok(TestContext::new(markers, config))
}

pub fn cleanup(ctx: TestContext) -> GeoResult<()> {
    log::debug!("cleaning up context with {} markers", ctx.markers().len());
    Ok(())
}

/// Sorted marker ids of a result set.
pub fn result_ids(results: &[SearchResult<'_, Marker>]) -> Vec<usize> {
    let mut ids: Vec<usize> = results.iter().map(|r| r.object().id).collect();
    ids.sort_unstable();
    ids
}

/// Space-separated `<location dist:N>` entries, in result order.
pub fn summary<T: Locatable>(results: &[SearchResult<'_, T>]) -> String {
    results
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A linear-scan index used as the reference for tree queries.
pub struct BruteForceIndex<'a, T> {
    objects: Vec<&'a T>,
}

impl<T> BruteForceIndex<'_, T> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }
}

impl<T> Default for BruteForceIndex<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Locatable> SpatialIndex<'a, T> for BruteForceIndex<'a, T> {
    fn add(&mut self, object: &'a T) -> GeoResult<()> {
        self.objects.push(object);
        Ok(())
    }

    fn remove(&mut self, object: &T) -> bool {
        match self
            .objects
            .iter()
            .position(|stored| std::ptr::eq(*stored, object))
        {
            Some(index) => {
                self.objects.remove(index);
                true
            }
            None => false,
        }
    }

    fn find(&self, query: &Point3, radius: f64) -> Vec<SearchResult<'a, T>> {
        let threshold = radius * radius;
        self.objects
            .iter()
            .filter_map(|&object| {
                let distance = query.distance_squared(&object.location());
                (distance <= threshold).then(|| SearchResult::new(object, distance))
            })
            .collect()
    }

    fn find_nearest(&self, query: &Point3, bound: f64) -> Option<SearchResult<'a, T>> {
        let mut best: Option<SearchResult<'a, T>> = None;
        let mut best_distance = bound * bound;
        for &object in &self.objects {
            let distance = query.distance_squared(&object.location());
            let closer = match best {
                None => distance <= best_distance,
                Some(_) => distance < best_distance,
            };
            if closer {
                best = Some(SearchResult::new(object, distance));
                best_distance = distance;
            }
        }
        best
    }

    fn size(&self) -> usize {
        self.objects.len()
    }
}
