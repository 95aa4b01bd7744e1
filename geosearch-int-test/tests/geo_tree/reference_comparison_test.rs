//! Tree queries compared against a linear scan over the same markers.

use geosearch::{
    AxisCycle, CollapsePolicy, GeoTree, Point3, SpatialIndex, SplitPolicy, TreeConfig,
};
use geosearch_int_test::test_util::{
    cleanup, create_test_context_with, random_markers, random_queries, result_ids, run_test,
    BruteForceIndex, Marker,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RADII: [f64; 4] = [0.0, 30.0, 120.0, 400.0];

fn assert_same_answers<'a>(
    tree: &dyn SpatialIndex<'a, Marker>,
    reference: &dyn SpatialIndex<'a, Marker>,
    queries: &[Point3],
) {
    assert_eq!(tree.size(), reference.size());
    for query in queries {
        for radius in RADII {
            assert_eq!(
                result_ids(&tree.find(query, radius)),
                result_ids(&reference.find(query, radius)),
                "find({}, {})",
                query,
                radius
            );
        }

        let expected = reference.find_nearest(query, 500.0);
        let actual = tree.find_nearest(query, 500.0);
        assert_eq!(
            actual.map(|r| r.squared_distance()),
            expected.map(|r| r.squared_distance()),
            "find_nearest({})",
            query
        );
    }
}

fn config(
    split_policy: SplitPolicy,
    axis_cycle: AxisCycle,
    collapse_policy: CollapsePolicy,
) -> TreeConfig {
    TreeConfig {
        leaf_capacity: 5,
        split_policy,
        axis_cycle,
        collapse_policy,
        seed: 2024,
    }
}

#[test]
fn test_insert_only_workloads_match_reference() {
    for split_policy in [SplitPolicy::Median, SplitPolicy::RandomMember] {
        for axis_cycle in [AxisCycle::Xyz, AxisCycle::Xyx] {
            run_test(
                || {
                    create_test_context_with(
                        config(split_policy, axis_cycle, CollapsePolicy::PromoteSibling),
                        random_markers(31, 600, 1000.0),
                    )
                },
                |ctx| {
                    let tree = ctx.tree()?;
                    let reference = ctx.reference();
                    assert!(tree.check_integrity().is_valid());
                    assert_same_answers(&tree, &reference, &random_queries(32, 40, 1000.0));
                    Ok(())
                },
                |ctx| cleanup(ctx),
            )
        }
    }
}

#[test]
fn test_mixed_workloads_match_reference() {
    for collapse_policy in [CollapsePolicy::KeepEmptyLeaf, CollapsePolicy::PromoteLeafSibling] {
        run_test(
            || {
                create_test_context_with(
                    config(SplitPolicy::Median, AxisCycle::Xyz, collapse_policy),
                    random_markers(41, 800, 1000.0),
                )
            },
            |ctx| {
                let markers = ctx.markers();
                let mut tree: GeoTree<'_, Marker> = GeoTree::with_config(ctx.config().clone())?;
                let mut reference: BruteForceIndex<'_, Marker> = BruteForceIndex::new();
                let mut rng = StdRng::seed_from_u64(42);
                let queries = random_queries(43, 15, 1000.0);

                // Interleave inserts with removals of random earlier markers
                for (i, marker) in markers.iter().enumerate() {
                    tree.add(marker)?;
                    reference.add(marker)?;

                    if i % 3 == 2 {
                        let victim = &markers[rng.gen_range(0..=i)];
                        assert_eq!(tree.remove(victim), reference.remove(victim));
                    }
                    if i % 200 == 199 {
                        assert!(tree.check_integrity().is_valid());
                        assert_same_answers(&tree, &reference, &queries);
                    }
                }

                // Drain everything
                for marker in markers {
                    assert_eq!(tree.remove(marker), reference.remove(marker));
                }
                assert!(tree.is_empty());
                assert!(tree.check_integrity().is_valid());
                assert!(tree.find(&Point3::new(500.0, 500.0, 500.0), 2000.0).is_empty());
                Ok(())
            },
            |ctx| cleanup(ctx),
        )
    }
}

#[test]
fn test_reference_index_semantics() {
    let markers = random_markers(51, 20, 100.0);
    let mut reference: BruteForceIndex<'_, Marker> = BruteForceIndex::new();
    for marker in &markers {
        reference.add(marker).unwrap();
    }

    let twin = markers[3].clone();
    assert!(!reference.remove(&twin));
    assert!(reference.remove(&markers[3]));
    assert_eq!(reference.size(), 19);
    assert!(reference.find_nearest(&Point3::new(1e6, 0.0, 0.0), 10.0).is_none());
}

#[test]
fn test_context_reference_holds_every_marker() {
    run_test(
        || {
            create_test_context_with(
                config(SplitPolicy::Median, AxisCycle::Xyz, CollapsePolicy::KeepEmptyLeaf),
                random_markers(61, 50, 100.0),
            )
        },
        |ctx| {
            let reference = ctx.reference();
            assert_eq!(reference.size(), ctx.markers().len());
            for marker in ctx.markers() {
                let found = reference.find(&marker.position, 0.0);
                assert!(found.iter().any(|r| std::ptr::eq(r.object(), marker)));
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
