//! Removal-time collapse under each policy.

use geosearch::{CollapsePolicy, GeoTree, Point3, TreeConfig};
use geosearch_int_test::test_util::{cleanup, create_test_context_with, run_test, Marker};

fn single_object_leaves(collapse_policy: CollapsePolicy) -> TreeConfig {
    TreeConfig {
        leaf_capacity: 1,
        collapse_policy,
        ..TreeConfig::default()
    }
}

/// Root splits on x; the right child splits on y at 100.
fn staircase() -> Vec<Marker> {
    vec![
        Marker::new(0, Point3::new(0.0, 0.0, 0.0)),
        Marker::new(1, Point3::new(10.0, 0.0, 0.0)),
        Marker::new(2, Point3::new(20.0, 100.0, 0.0)),
    ]
}

#[test]
fn test_removal_of_one_of_two_objects() {
    for policy in [
        CollapsePolicy::PromoteSibling,
        CollapsePolicy::KeepEmptyLeaf,
        CollapsePolicy::PromoteLeafSibling,
    ] {
        run_test(
            || {
                let markers = vec![
                    Marker::new(0, Point3::new(1.0, 1.0, 1.0)),
                    Marker::new(1, Point3::new(2.0, 2.0, 2.0)),
                ];
                create_test_context_with(single_object_leaves(policy), markers)
            },
            |ctx| {
                let mut tree = ctx.tree()?;
                assert_eq!(tree.stats().internal_count, 1);

                let [first, second] = ctx.markers() else {
                    unreachable!()
                };
                assert!(tree.remove(first));
                assert_eq!(tree.size(), 1);

                let found = tree.find(&second.position, 0.0);
                assert_eq!(found.len(), 1);
                assert!(std::ptr::eq(found[0].object(), second));
                assert!(tree.check_integrity().is_valid());

                let expected_leaves = match policy {
                    CollapsePolicy::KeepEmptyLeaf => 2,
                    _ => 1,
                };
                assert_eq!(tree.stats().leaf_count, expected_leaves);
                Ok(())
            },
            |ctx| cleanup(ctx),
        )
    }
}

#[test]
fn test_promote_sibling_is_reported_by_integrity_check() {
    run_test(
        || create_test_context_with(single_object_leaves(CollapsePolicy::PromoteSibling), staircase()),
        |ctx| {
            let mut tree = ctx.tree()?;
            let markers = ctx.markers();
            assert!(tree.remove(&markers[0]));

            let report = tree.check_integrity();
            assert!(!report.is_valid());
            assert_eq!(report.split_violations.len(), 1);
            assert_eq!(report.counted_objects, 2);
            assert!(report.capacity_violations.is_empty());

            // The promoted y bisector is now read as x
            assert!(tree.dump().starts_with("#2 internal x=100"));
            assert!(tree.find(&markers[2].position, 0.0).is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_safe_policies_keep_every_object_reachable() {
    for policy in [CollapsePolicy::KeepEmptyLeaf, CollapsePolicy::PromoteLeafSibling] {
        run_test(
            || create_test_context_with(single_object_leaves(policy), staircase()),
            |ctx| {
                let mut tree = ctx.tree()?;
                let markers = ctx.markers();
                assert!(tree.remove(&markers[0]));
                assert!(tree.check_integrity().is_valid());

                for marker in &markers[1..] {
                    let nearest = tree.find_nearest(&marker.position, 1.0);
                    assert!(nearest.is_some_and(|r| std::ptr::eq(r.object(), marker)));
                }
                Ok(())
            },
            |ctx| cleanup(ctx),
        )
    }
}

#[test]
fn test_clear_then_reuse() {
    run_test(
        || create_test_context_with(single_object_leaves(CollapsePolicy::PromoteSibling), staircase()),
        |ctx| {
            let mut tree: GeoTree<'_, Marker> = ctx.tree()?;
            tree.clear();
            assert!(tree.is_empty());
            assert_eq!(tree.stats().leaf_count, 1);

            for marker in ctx.markers() {
                tree.add(marker)?;
            }
            assert_eq!(tree.size(), 3);
            assert!(tree.check_integrity().is_valid());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
