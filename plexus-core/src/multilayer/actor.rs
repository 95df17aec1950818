//! Actor-centric measures across layer subsets.
//!
//! Every measure takes the queried layers as a slice; ids that name no layer
//! are ignored. "All layers" always means every layer of the graph.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::instrument;

use super::MultilayerGraph;
use crate::node::{LayerId, NodeId};

impl MultilayerGraph {
    /// Sum of the actor's neighbour counts over `layers`.
    #[must_use]
    pub fn degree_centrality(&self, actor: NodeId, layers: &[LayerId]) -> usize {
        layers
            .iter()
            .filter_map(|layer| self.layer(*layer))
            .map(|store| store.neighbour_count(actor))
            .sum()
    }

    /// Population standard deviation of the per-layer degree over `layers`.
    ///
    /// The mean is the all-layers degree centrality divided by the all-layers
    /// count, and the squared deviations are divided by that same count, so a
    /// subset query is still normalised against the whole graph. `NaN` when
    /// the graph has no layers.
    #[must_use]
    pub fn degree_deviation(&self, actor: NodeId, layers: &[LayerId]) -> f64 {
        let count = self.layer_count();
        if count == 0 {
            return f64::NAN;
        }
        let mean = self.degree_centrality(actor, &self.layer_ids()) as f64 / count as f64;
        let squares: f64 = layers
            .iter()
            .filter_map(|layer| self.layer(*layer))
            .map(|store| (store.neighbour_count(actor) as f64 - mean).powi(2))
            .sum();
        (squares / count as f64).sqrt()
    }

    /// Union of the actor's neighbours over `layers`.
    #[must_use]
    pub fn neighbours(&self, actor: NodeId, layers: &[LayerId]) -> BTreeSet<NodeId> {
        layers
            .iter()
            .filter_map(|layer| self.layer(*layer))
            .flat_map(|store| store.neighbours(actor))
            .collect()
    }

    /// Number of distinct neighbours over `layers`.
    #[must_use]
    pub fn neighbourhood_centrality(&self, actor: NodeId, layers: &[LayerId]) -> usize {
        self.neighbours(actor, layers).len()
    }

    /// `1 − NC/DC`: the share of per-layer connections that repeat a
    /// neighbour. `NaN` when the degree centrality is zero.
    #[must_use]
    pub fn connective_redundancy(&self, actor: NodeId, layers: &[LayerId]) -> f64 {
        let degree = self.degree_centrality(actor, layers);
        if degree == 0 {
            return f64::NAN;
        }
        1.0 - self.neighbourhood_centrality(actor, layers) as f64 / degree as f64
    }

    /// Neighbours reachable in `layers` but in no other layer.
    #[must_use]
    pub fn exclusive_neighbourhood_centrality(&self, actor: NodeId, layers: &[LayerId]) -> usize {
        let outside = self.neighbours(actor, &self.complement(layers));
        self.neighbours(actor, layers)
            .difference(&outside)
            .count()
    }

    /// `NC(layers) / NC(all)`; `NaN` when the actor has no neighbours.
    #[must_use]
    pub fn relevance(&self, actor: NodeId, layers: &[LayerId]) -> f64 {
        self.normalised(actor, self.neighbourhood_centrality(actor, layers))
    }

    /// `XNC(layers) / NC(all)`; `NaN` when the actor has no neighbours.
    #[must_use]
    pub fn exclusive_relevance(&self, actor: NodeId, layers: &[LayerId]) -> f64 {
        self.normalised(actor, self.exclusive_neighbourhood_centrality(actor, layers))
    }

    /// Relevance of every actor in every layer.
    ///
    /// Layers without the actor score `0`; an actor with no neighbours
    /// anywhere scores `NaN` throughout.
    #[instrument(name = "multilayer.relevance_table", skip(self), fields(actors = self.actor_count()))]
    #[must_use]
    pub fn relevance_table(&self) -> BTreeMap<NodeId, BTreeMap<LayerId, f64>> {
        self.per_layer_table(Self::relevance)
    }

    /// Exclusive relevance of every actor in every layer, with the same
    /// conventions as [`Self::relevance_table`].
    #[instrument(
        name = "multilayer.exclusive_relevance_table",
        skip(self),
        fields(actors = self.actor_count())
    )]
    #[must_use]
    pub fn exclusive_relevance_table(&self) -> BTreeMap<NodeId, BTreeMap<LayerId, f64>> {
        self.per_layer_table(Self::exclusive_relevance)
    }

    /// Mean of every actor measure over all actors for the queried layers.
    ///
    /// Undefined (`NaN`) values are skipped; a measure with no defined value
    /// averages to `NaN`.
    #[instrument(name = "multilayer.actor_averages", skip(self, layers), fields(actors = self.actor_count()))]
    #[must_use]
    pub fn actor_averages(&self, layers: &[LayerId]) -> ActorAverages {
        let sums = self
            .actors()
            .par_iter()
            .map(|actor| self.actor_row(*actor, layers))
            .fold(MeanRow::default, MeanRow::push)
            .reduce(MeanRow::default, MeanRow::merge);
        sums.averages()
    }

    fn actor_row(&self, actor: NodeId, layers: &[LayerId]) -> [f64; MEASURES] {
        [
            self.degree_centrality(actor, layers) as f64,
            self.degree_deviation(actor, layers),
            self.neighbourhood_centrality(actor, layers) as f64,
            self.connective_redundancy(actor, layers),
            self.exclusive_neighbourhood_centrality(actor, layers) as f64,
            self.relevance(actor, layers),
            self.exclusive_relevance(actor, layers),
        ]
    }

    fn per_layer_table(
        &self,
        measure: fn(&Self, NodeId, &[LayerId]) -> f64,
    ) -> BTreeMap<NodeId, BTreeMap<LayerId, f64>> {
        let ids = self.layer_ids();
        self.actors()
            .par_iter()
            .map(|actor| {
                let row = ids
                    .iter()
                    .map(|layer| (*layer, measure(self, *actor, &[*layer])))
                    .collect();
                (*actor, row)
            })
            .collect()
    }

    fn normalised(&self, actor: NodeId, value: usize) -> f64 {
        let total = self.neighbourhood_centrality(actor, &self.layer_ids());
        if total == 0 {
            return f64::NAN;
        }
        value as f64 / total as f64
    }
}

const MEASURES: usize = 7;

/// Mean actor measures over a layer subset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorAverages {
    /// Mean degree centrality.
    pub degree_centrality: f64,
    /// Mean degree deviation.
    pub degree_deviation: f64,
    /// Mean neighbourhood centrality.
    pub neighbourhood_centrality: f64,
    /// Mean connective redundancy over actors with a non-zero degree.
    pub connective_redundancy: f64,
    /// Mean exclusive neighbourhood centrality.
    pub exclusive_neighbourhood_centrality: f64,
    /// Mean relevance over actors with neighbours.
    pub relevance: f64,
    /// Mean exclusive relevance over actors with neighbours.
    pub exclusive_relevance: f64,
}

#[derive(Default)]
struct MeanRow {
    sums: [f64; MEASURES],
    counts: [usize; MEASURES],
}

impl MeanRow {
    fn push(mut self, row: [f64; MEASURES]) -> Self {
        for (slot, value) in row.into_iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            self.sums[slot] += value;
            self.counts[slot] += 1;
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for slot in 0..MEASURES {
            self.sums[slot] += other.sums[slot];
            self.counts[slot] += other.counts[slot];
        }
        self
    }

    fn averages(&self) -> ActorAverages {
        let mean = |slot: usize| {
            if self.counts[slot] == 0 {
                f64::NAN
            } else {
                self.sums[slot] / self.counts[slot] as f64
            }
        };
        ActorAverages {
            degree_centrality: mean(0),
            degree_deviation: mean(1),
            neighbourhood_centrality: mean(2),
            connective_redundancy: mean(3),
            exclusive_neighbourhood_centrality: mean(4),
            relevance: mean(5),
            exclusive_relevance: mean(6),
        }
    }
}
