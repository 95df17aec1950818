//! Multilayer (time-sliced) graphs.
//!
//! A [`MultilayerGraph`] owns one [`GraphStore`] per layer plus the global
//! actor set. Layers are independent: no edge crosses layers, while an actor
//! may appear in any number of them. Layers iterate in ascending id order.

mod actor;
mod occupation;
mod summary;

pub use actor::ActorAverages;
pub use summary::LayerSummary;

use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroUsize,
};

use tracing::instrument;

use crate::{
    node::{LayerId, NodeId},
    store::{EdgeOutcome, GraphConfig, GraphStore},
};

/// Ordered collection of layers sharing one actor set.
///
/// # Examples
/// ```
/// use plexus_core::{GraphConfig, LayerId, MultilayerGraph, NodeId};
///
/// let mut graph = MultilayerGraph::new(GraphConfig::new());
/// let (work, home) = (LayerId::new(1), LayerId::new(2));
/// graph.add_edge(work, NodeId::new(0), NodeId::new(1), 1.0);
/// graph.add_edge(home, NodeId::new(0), NodeId::new(2), 1.0);
/// assert_eq!(graph.layer_count(), 2);
/// assert_eq!(graph.degree_centrality(NodeId::new(0), &[work, home]), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MultilayerGraph {
    config: GraphConfig,
    layers: BTreeMap<LayerId, GraphStore>,
    actors: BTreeSet<NodeId>,
}

impl MultilayerGraph {
    /// Creates an empty multilayer graph whose layers use `config`.
    #[must_use]
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            layers: BTreeMap::new(),
            actors: BTreeSet::new(),
        }
    }

    /// Structural flags shared by lazily created layers.
    #[rustfmt::skip]
    #[must_use]
    pub fn config(&self) -> GraphConfig { self.config }

    /// Adds `actor` to `layer`, creating the layer on first reference.
    pub fn add_node(&mut self, layer: LayerId, actor: NodeId) -> bool {
        self.actors.insert(actor);
        self.layer_entry(layer).add_node(actor)
    }

    /// Adds an edge inside `layer`, creating the layer and both endpoints
    /// when missing.
    pub fn add_edge(&mut self, layer: LayerId, from: NodeId, to: NodeId, weight: f64) -> EdgeOutcome {
        self.actors.insert(from);
        self.actors.insert(to);
        let store = self.layer_entry(layer);
        store.add_node(from);
        store.add_node(to);
        store.add_edge(from, to, weight)
    }

    /// Installs a prebuilt store as `layer`, replacing any existing layer,
    /// and records its nodes as actors.
    pub fn insert_layer(&mut self, layer: LayerId, store: GraphStore) -> Option<GraphStore> {
        self.actors.extend(store.nodes());
        self.layers.insert(layer, store)
    }

    /// Store backing `layer`.
    #[must_use]
    pub fn layer(&self, layer: LayerId) -> Option<&GraphStore> {
        self.layers.get(&layer)
    }

    /// Every layer id in ascending order.
    #[must_use]
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.keys().copied().collect()
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Iterates over `(layer, store)` in ascending layer order.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &GraphStore)> + '_ {
        self.layers.iter().map(|(id, store)| (*id, store))
    }

    /// Every actor seen in any layer, in ascending order.
    #[must_use]
    pub fn actors(&self) -> &BTreeSet<NodeId> {
        &self.actors
    }

    /// Number of distinct actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Layers from `layers` that exist and contain `actor`, in query order.
    #[must_use]
    pub fn layers_containing(&self, actor: NodeId, layers: &[LayerId]) -> Vec<LayerId> {
        layers
            .iter()
            .copied()
            .filter(|layer| self.layer(*layer).is_some_and(|store| store.has_node(actor)))
            .collect()
    }

    /// Union of the selected layers as one unweighted store.
    ///
    /// Nodes keep the order in which the selected layers list them; edges
    /// present in several layers collapse into one.
    #[instrument(name = "multilayer.flatten", skip(self, layers), fields(layers = layers.len()))]
    #[must_use]
    pub fn flatten(&self, layers: &[LayerId]) -> GraphStore {
        let flat = GraphStore::with_config(
            GraphConfig::unweighted().with_directed(self.config.is_directed()),
        );
        let selected: Vec<&GraphStore> = layers.iter().filter_map(|id| self.layer(*id)).collect();
        for store in &selected {
            for node in store.nodes() {
                flat.add_node(node);
            }
        }
        for store in &selected {
            for (source, target, _) in store.edges() {
                flat.add_edge(source, target, 1.0);
            }
        }
        flat.recompute_degrees();
        flat
    }

    /// Merges consecutive groups of `window` layers, keyed by the first layer
    /// of each group.
    ///
    /// Weights accumulate under matching edges in weighted graphs.
    #[instrument(name = "multilayer.coalesce", skip(self), fields(layers = self.layer_count()))]
    #[must_use]
    pub fn coalesce_windows(&self, window: NonZeroUsize) -> Self {
        let mut coalesced = Self::new(self.config);
        let ids = self.layer_ids();
        for group in ids.chunks(window.get()) {
            let Some(first) = group.first() else {
                continue;
            };
            let merged = GraphStore::with_config(self.config);
            for id in group {
                if let Some(store) = self.layer(*id) {
                    merged.merge_from(store);
                }
            }
            coalesced.insert_layer(*first, merged);
        }
        coalesced
    }

    /// Turns every layer into the union of itself and all earlier layers.
    #[instrument(name = "multilayer.cumulative", skip(self), fields(layers = self.layer_count()))]
    #[must_use]
    pub fn cumulative(&self) -> Self {
        let mut cumulative = Self::new(self.config);
        let running = GraphStore::with_config(self.config);
        for (id, store) in self.layers() {
            running.merge_from(store);
            cumulative.insert_layer(id, running.clone());
        }
        cumulative
    }

    fn layer_entry(&mut self, layer: LayerId) -> &GraphStore {
        let config = self.config;
        self.layers
            .entry(layer)
            .or_insert_with(|| GraphStore::with_config(config))
    }

    /// Layers outside `layers`, in ascending order.
    fn complement(&self, layers: &[LayerId]) -> Vec<LayerId> {
        let excluded: BTreeSet<LayerId> = layers.iter().copied().collect();
        self.layers
            .keys()
            .copied()
            .filter(|layer| !excluded.contains(layer))
            .collect()
    }
}
