//! End-to-end tests of a tree built from generated markers.

use geosearch::{GeoError, GeoTree, Point3, SpatialIndex, TreeConfig};
use geosearch_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, random_grid_markers, result_ids,
    run_test, summary, Marker,
};

fn grid_config(leaf_capacity: usize) -> TreeConfig {
    TreeConfig {
        leaf_capacity,
        ..TreeConfig::default()
    }
}

#[test]
fn test_every_marker_found_at_its_location() {
    run_test(
        || create_test_context_with(grid_config(4), random_grid_markers(123, 500, 1000)),
        |ctx| {
            let tree = ctx.tree()?;
            assert_eq!(tree.size(), ctx.markers().len());

            for marker in ctx.markers() {
                let found = tree.find(&marker.position, 0.0);
                assert!(
                    found.iter().any(|r| std::ptr::eq(r.object(), marker)),
                    "{} not found",
                    marker
                );
                assert!(found.iter().all(|r| r.object().position == marker.position));
            }
            assert!(tree.check_integrity().is_valid());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_summary_of_exact_match() {
    run_test(
        || {
            let markers = vec![
                Marker::new(0, Point3::new(10.0, 20.0, 30.0)),
                Marker::new(1, Point3::new(13.0, 24.0, 30.0)),
                Marker::new(2, Point3::new(500.0, 500.0, 500.0)),
            ];
            create_test_context_with(grid_config(2), markers)
        },
        |ctx| {
            let tree = ctx.tree()?;
            let origin = ctx.markers()[0].position;

            assert_eq!(summary(&tree.find(&origin, 0.0)), "<(10, 20, 30) dist:0>");

            let mut near = tree.find(&origin, 5.0);
            near.sort_by(|a, b| a.squared_distance().total_cmp(&b.squared_distance()));
            assert_eq!(
                summary(&near),
                "<(10, 20, 30) dist:0> <(13, 24, 30) dist:5>"
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_radius_monotonicity() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree()?;
            let query = Point3::new(500.0, 500.0, 500.0);

            let mut previous: Vec<usize> = Vec::new();
            for radius in [0.0, 25.0, 50.0, 100.0, 200.0, 400.0, 900.0] {
                let ids = result_ids(&tree.find(&query, radius));
                assert!(previous.iter().all(|id| ids.binary_search(id).is_ok()));
                previous = ids;
            }
            assert_eq!(previous.len(), ctx.markers().len());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_nearest_within_radius_results() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree()?;
            for query in [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(250.0, 750.0, 100.0),
                Point3::new(999.0, 1.0, 500.0),
            ] {
                let within = tree.find(&query, 120.0);
                let nearest = tree.find_nearest(&query, 120.0);

                match nearest {
                    Some(best) => {
                        let minimum = within
                            .iter()
                            .map(|r| r.squared_distance())
                            .fold(f64::INFINITY, f64::min);
                        assert!(best.squared_distance() <= minimum);
                        assert!(within.iter().any(|r| std::ptr::eq(r.object(), best.object())));
                    }
                    None => assert!(within.is_empty()),
                }
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_size_tracks_adds_and_removes() {
    run_test(
        || create_test_context(),
        |ctx| {
            let config = TreeConfig {
                collapse_policy: geosearch::CollapsePolicy::KeepEmptyLeaf,
                ..ctx.config().clone()
            };
            let mut tree: GeoTree<'_, Marker> = GeoTree::with_config(config)?;
            let markers = ctx.markers();
            for marker in markers {
                tree.add(marker)?;
            }

            let stranger = Marker::new(usize::MAX, markers[0].position);
            assert!(!tree.remove(&stranger));
            assert_eq!(tree.size(), markers.len());

            let mut removed = 0;
            for marker in markers.iter().step_by(3) {
                assert!(tree.remove(marker));
                removed += 1;
                assert_eq!(tree.size(), markers.len() - removed);
            }
            assert!(!tree.remove(&markers[0]));
            assert_eq!(tree.size(), markers.len() - removed);

            let stats = tree.stats();
            assert_eq!(stats.size, tree.size());
            assert!(tree.check_integrity().is_valid());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_capacity_bound_holds() {
    run_test(
        || create_test_context_with(grid_config(3), random_grid_markers(7, 800, 1000)),
        |ctx| {
            let tree = ctx.tree()?;
            let report = tree.check_integrity();
            assert!(report.capacity_violations.is_empty());
            assert_eq!(report.counted_objects, ctx.markers().len());

            let stats = tree.stats();
            assert!(stats.leaf_count * 3 >= ctx.markers().len());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_degenerate_input_is_reported() {
    run_test(
        || {
            let markers = (0..5)
                .map(|id| Marker::new(id, Point3::new(5.0, 5.0, 5.0)))
                .collect();
            create_test_context_with(grid_config(4), markers)
        },
        |ctx| {
            match ctx.tree() {
                Err(GeoError::DegenerateSplit { population, .. }) => assert_eq!(population, 5),
                other => panic!("expected a degenerate split, got {:?}", other.map(|t| t.size())),
            }

            // The first four still fit in one leaf
            let mut tree: GeoTree<'_, Marker> = GeoTree::with_config(ctx.config().clone())?;
            for marker in &ctx.markers()[..4] {
                tree.add(marker)?;
            }
            assert!(tree.add(&ctx.markers()[4]).is_err());
            assert_eq!(tree.size(), 4);
            assert_eq!(tree.find(&Point3::new(5.0, 5.0, 5.0), 0.0).len(), 4);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_tree_as_spatial_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree()?;
            let index: &dyn SpatialIndex<'_, Marker> = &tree;
            assert_eq!(index.size(), ctx.markers().len());
            assert!(!index.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
