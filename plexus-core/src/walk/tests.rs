//! Tests for occupation-centrality walks.

use super::*;

use rstest::rstest;

use crate::test_utils::{complete_graph, graph_from_edges, id, ring_graph};

#[rstest]
#[case::zero_steps(0, 5)]
#[case::zero_walks(5, 0)]
fn params_reject_zero_counts(#[case] steps: usize, #[case] walks: usize) {
    let err = WalkParams::new(steps, walks).expect_err("zero counts are invalid");
    assert_eq!(err.code().as_str(), "WALK_INVALID_PARAMETERS");
}

#[rstest]
fn unknown_start_node_is_reported() {
    let params = WalkParams::new(4, 2).expect("params must be valid");
    let err = occupation_centrality(&ring_graph(4), id(99), &params)
        .expect_err("node 99 is absent");
    assert_eq!(err, WalkError::UnknownNode { node: id(99) });
}

#[rstest]
fn two_node_walk_returns_every_other_step() {
    let graph = graph_from_edges(2, &[(0, 1)]);
    let params = WalkParams::new(10, 8).expect("params must be valid");
    let value = occupation_centrality(&graph, id(0), &params).expect("node exists");
    assert_eq!(value, 5.0);
}

#[rstest]
fn isolated_start_never_counts() {
    let graph = graph_from_edges(3, &[(1, 2)]);
    let params = WalkParams::new(10, 4).expect("params must be valid");
    let value = occupation_centrality(&graph, id(0), &params).expect("node exists");
    assert_eq!(value, 0.0);
}

#[rstest]
fn estimates_are_reproducible_for_a_seed() {
    let graph = complete_graph(6);
    let params = WalkParams::new(50, 16)
        .expect("params must be valid")
        .with_rng_seed(42);
    let first = occupation_centrality(&graph, id(2), &params).expect("node exists");
    let second = occupation_centrality(&graph, id(2), &params).expect("node exists");
    assert_eq!(first.to_bits(), second.to_bits());
}

#[rstest]
fn complete_graph_estimate_is_near_expectation() {
    // The stationary distribution on K5 is uniform, so 400 steps land on the
    // start roughly 80 times.
    let graph = complete_graph(5);
    let params = WalkParams::new(400, 64)
        .expect("params must be valid")
        .with_rng_seed(5);
    let value = occupation_centrality(&graph, id(0), &params).expect("node exists");
    assert!((72.0..=88.0).contains(&value), "estimate {value}");
}

#[rstest]
fn average_over_empty_graph_is_nan() {
    let params = WalkParams::new(3, 3).expect("params must be valid");
    assert!(average_occupation_centrality(&crate::GraphStore::new(), &params).is_nan());
}

#[rstest]
fn average_over_regular_graph_matches_single_node_bounds() {
    let graph = graph_from_edges(2, &[(0, 1)]);
    let params = WalkParams::new(6, 3).expect("params must be valid");
    assert_eq!(average_occupation_centrality(&graph, &params), 3.0);
}
