//! Shared test utilities for `plexus-core`.

use plexus_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{GraphConfig, GraphStore, NodeId};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `PLEXUS_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

#[rustfmt::skip]
pub(crate) const fn id(raw: u64) -> NodeId { NodeId::new(raw) }

/// Unweighted undirected graph on nodes `0..nodes` with the given edges.
pub(crate) fn graph_from_edges(nodes: u64, edges: &[(u64, u64)]) -> GraphStore {
    let graph = GraphStore::with_config(GraphConfig::unweighted());
    for node in 0..nodes {
        graph.add_node(id(node));
    }
    for &(left, right) in edges {
        graph.add_undirected_edge(id(left), id(right), 1.0);
    }
    graph.recompute_degrees();
    graph
}

/// Complete undirected graph on nodes `0..nodes`.
pub(crate) fn complete_graph(nodes: u64) -> GraphStore {
    let edges: Vec<(u64, u64)> = (0..nodes)
        .flat_map(|left| ((left + 1)..nodes).map(move |right| (left, right)))
        .collect();
    graph_from_edges(nodes, &edges)
}

/// Undirected ring `0 - 1 - ... - (nodes-1) - 0`.
pub(crate) fn ring_graph(nodes: u64) -> GraphStore {
    let edges: Vec<(u64, u64)> = (0..nodes).map(|node| (node, (node + 1) % nodes)).collect();
    graph_from_edges(nodes, &edges)
}
