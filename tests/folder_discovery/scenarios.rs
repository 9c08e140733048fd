//! BDD scenarios for recursive folder discovery.

use rstest_bdd_macros::scenario;

use super::test_helpers::{DiscoveryContext, discovery_context};

#[scenario(
    path = "tests/features/folder_discovery.feature",
    name = "Discover nested folders and skip jobs"
)]
fn scenario_nested_folders(discovery_context: DiscoveryContext) {
    drop(discovery_context);
}

#[scenario(
    path = "tests/features/folder_discovery.feature",
    name = "Visit each folder before its next sibling"
)]
fn scenario_depth_first_order(discovery_context: DiscoveryContext) {
    drop(discovery_context);
}

#[scenario(
    path = "tests/features/folder_discovery.feature",
    name = "Abort discovery when a listing is rejected"
)]
fn scenario_unauthorised_listing(discovery_context: DiscoveryContext) {
    drop(discovery_context);
}
