//! Per-layer aggregate statistics.

use rayon::prelude::*;
use tracing::instrument;

use super::MultilayerGraph;
use crate::{
    measures,
    node::{LayerId, NodeId},
    store::GraphStore,
};

/// Structural statistics of one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSummary {
    /// Layer the row describes.
    pub layer: LayerId,
    /// Node count.
    pub nodes: usize,
    /// Edge count.
    pub edges: usize,
    /// Edge density, `NaN` below two nodes.
    pub density: f64,
    /// Mean neighbour count, `NaN` for an empty layer.
    pub average_degree: f64,
    /// Mean summed edge weight, `NaN` for an empty layer.
    pub average_weighted_degree: f64,
    /// Mean clustering coefficient, `NaN` for an empty layer.
    pub average_clustering: f64,
    /// Node with the most neighbours and its neighbour count.
    pub most_connected: Option<(NodeId, usize)>,
}

impl LayerSummary {
    /// Summarises a single store.
    ///
    /// Refreshes the store's degree cache before averaging it.
    #[must_use]
    pub fn of(layer: LayerId, store: &GraphStore) -> Self {
        store.recompute_degrees();
        Self {
            layer,
            nodes: store.node_count(),
            edges: store.edge_count(),
            density: measures::density(store),
            average_degree: measures::average_degree(store).unwrap_or(f64::NAN),
            average_weighted_degree: measures::average_weighted_degree(store),
            average_clustering: measures::average_clustering_coefficient(store),
            most_connected: measures::most_connected_node(store),
        }
    }
}

impl MultilayerGraph {
    /// One [`LayerSummary`] per layer in ascending layer order, computed in
    /// parallel over layers.
    ///
    /// Every layer's degree cache is rebuilt from its adjacency first, so
    /// cached degrees read afterwards match the neighbour counts.
    #[instrument(name = "multilayer.layer_summaries", skip(self), fields(layers = self.layer_count()))]
    #[must_use]
    pub fn layer_summaries(&self) -> Vec<LayerSummary> {
        self.layers
            .par_iter()
            .map(|(layer, store)| LayerSummary::of(*layer, store))
            .collect()
    }
}
