//! GeoTree integration test module.
//!
//! These tests drive the tree through its public API with generated
//! workloads and compare it against a brute-force index.

mod collapse_policy_test;
mod geo_tree_test;
mod reference_comparison_test;
