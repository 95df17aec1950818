//! Structural measures over a populated [`GraphStore`].
//!
//! Every reduction runs on the rayon pool and accumulates with associative
//! integer or floating-point sums, so results do not depend on worker
//! interleaving beyond floating-point rounding. Degenerate denominators yield
//! `NaN` rather than panicking.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;
use tracing::instrument;

use crate::{error::MeasureError, node::NodeId, store::GraphStore};

/// Mean of the cached degrees.
///
/// # Errors
/// Returns [`MeasureError::DegreeNotComputed`] when any node has no cached
/// degree.
///
/// # Examples
/// ```
/// use plexus_core::{GraphStore, NodeId, measures};
///
/// let graph = GraphStore::new();
/// for raw in 0..3 {
///     graph.add_node(NodeId::new(raw));
/// }
/// graph.add_undirected_edge(NodeId::new(0), NodeId::new(1), 1.0);
/// graph.recompute_degrees();
/// let mean = measures::average_degree(&graph)?;
/// assert!((mean - 2.0 / 3.0).abs() < 1e-12);
/// # Ok::<(), plexus_core::MeasureError>(())
/// ```
#[instrument(name = "measures.average_degree", skip(graph), err)]
pub fn average_degree(graph: &GraphStore) -> Result<f64, MeasureError> {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return Ok(f64::NAN);
    }
    let total = nodes
        .par_iter()
        .map(|node| {
            graph
                .degree(*node)
                .ok_or(MeasureError::DegreeNotComputed { node: *node })
        })
        .try_reduce(|| 0, |left, right| Ok(left + right))?;
    Ok(total as f64 / nodes.len() as f64)
}

/// Mean of the summed edge weights per node. Empty graphs yield `NaN`.
#[must_use]
pub fn average_weighted_degree(graph: &GraphStore) -> f64 {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return f64::NAN;
    }
    let total: f64 = nodes
        .par_iter()
        .map(|node| graph.weighted_degree(*node))
        .sum();
    total / nodes.len() as f64
}

/// Local clustering coefficient of `node`.
///
/// Counts ordered neighbour pairs that are themselves connected and divides
/// by `sz·(sz−1)`. Nodes with fewer than two neighbours score 0.
#[must_use]
pub fn clustering_coefficient(graph: &GraphStore, node: NodeId) -> f64 {
    let neighbours = graph.neighbours(node);
    let size = neighbours.len();
    if size < 2 {
        return 0.0;
    }
    let members: HashSet<NodeId> = neighbours.iter().copied().collect();
    let connected: usize = neighbours
        .iter()
        .map(|first| {
            graph
                .neighbours(*first)
                .into_iter()
                .filter(|second| second != first && members.contains(second))
                .count()
        })
        .sum();
    connected as f64 / (size * (size - 1)) as f64
}

/// Mean clustering coefficient over all nodes. Empty graphs yield `NaN`.
#[instrument(name = "measures.average_clustering", skip(graph), fields(nodes = graph.node_count()))]
#[must_use]
pub fn average_clustering_coefficient(graph: &GraphStore) -> f64 {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return f64::NAN;
    }
    let total: f64 = nodes
        .par_iter()
        .map(|node| clustering_coefficient(graph, *node))
        .sum();
    total / nodes.len() as f64
}

/// Edge density: `2E/(N(N−1))` for undirected graphs, `E/(N(N−1))` for
/// directed ones. Graphs with fewer than two nodes yield `NaN`.
#[must_use]
pub fn density(graph: &GraphStore) -> f64 {
    let nodes = graph.node_count();
    if nodes < 2 {
        return f64::NAN;
    }
    let edges = graph.edge_count() as f64;
    let pairs = (nodes * (nodes - 1)) as f64;
    if graph.is_directed() {
        edges / pairs
    } else {
        2.0 * edges / pairs
    }
}

/// Node with the most neighbours and its neighbour count.
///
/// Ties go to the node inserted first. Empty graphs yield `None`.
#[must_use]
pub fn most_connected_node(graph: &GraphStore) -> Option<(NodeId, usize)> {
    graph
        .nodes()
        .into_par_iter()
        .enumerate()
        .map(|(position, node)| (graph.neighbour_count(node), std::cmp::Reverse(position), node))
        .max_by_key(|(count, position, _)| (*count, *position))
        .map(|(count, _, node)| (node, count))
}

/// Number of nodes per live degree.
#[must_use]
pub fn degree_distribution(graph: &GraphStore) -> BTreeMap<usize, usize> {
    graph
        .nodes()
        .par_iter()
        .fold(BTreeMap::new, |mut histogram, node| {
            *histogram.entry(graph.neighbour_count(*node)).or_insert(0) += 1;
            histogram
        })
        .reduce(BTreeMap::new, merge_counts)
}

/// Mean clustering coefficient of the nodes sharing each live degree.
#[must_use]
pub fn clustering_effect(graph: &GraphStore) -> BTreeMap<usize, f64> {
    let sums = graph
        .nodes()
        .par_iter()
        .fold(BTreeMap::new, |mut sums: BTreeMap<usize, (f64, usize)>, node| {
            let entry = sums
                .entry(graph.neighbour_count(*node))
                .or_insert((0.0, 0));
            entry.0 += clustering_coefficient(graph, *node);
            entry.1 += 1;
            sums
        })
        .reduce(BTreeMap::new, |mut left, right| {
            for (degree, (sum, count)) in right {
                let entry = left.entry(degree).or_insert((0.0, 0));
                entry.0 += sum;
                entry.1 += count;
            }
            left
        });
    sums.into_iter()
        .map(|(degree, (sum, count))| (degree, sum / count as f64))
        .collect()
}

fn merge_counts(
    mut left: BTreeMap<usize, usize>,
    right: BTreeMap<usize, usize>,
) -> BTreeMap<usize, usize> {
    for (degree, count) in right {
        *left.entry(degree).or_insert(0) += count;
    }
    left
}
