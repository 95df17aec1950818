//! Random walks that may switch layers.

use rand::{Rng, seq::SliceRandom};
use rayon::prelude::*;
use tracing::instrument;

use super::MultilayerGraph;
use crate::{
    error::WalkError,
    node::{LayerId, NodeId},
    rng::{mix_seed, unit_rng},
    walk::WalkParams,
};

impl MultilayerGraph {
    /// Estimates the occupation centrality of `actor` over `layers`.
    ///
    /// A walk starts in a uniformly chosen queried layer containing the
    /// actor, and that starting position counts as one visit. Each step draws
    /// uniformly from the neighbours in the current layer together with one
    /// "switch" option per other queried layer that contains the current
    /// node. A walk with no option left stops early.
    ///
    /// # Errors
    /// Returns [`WalkError::UnknownNode`] when no queried layer contains
    /// `actor`.
    #[instrument(
        name = "multilayer.occupation_centrality",
        skip(self, layers, params),
        fields(actor = %actor, layers = layers.len(), steps = params.steps()),
        err
    )]
    pub fn occupation_centrality(
        &self,
        actor: NodeId,
        layers: &[LayerId],
        params: &WalkParams,
    ) -> Result<f64, WalkError> {
        if self.layers_containing(actor, layers).is_empty() {
            return Err(WalkError::UnknownNode { node: actor });
        }
        Ok(self.estimate(actor, layers, params, params.rng_seed()))
    }

    /// Mean occupation centrality over every actor present in `layers`.
    ///
    /// `NaN` when no queried layer holds an actor.
    #[instrument(
        name = "multilayer.average_occupation_centrality",
        skip(self, layers, params),
        fields(layers = layers.len(), steps = params.steps())
    )]
    #[must_use]
    pub fn average_occupation_centrality(&self, layers: &[LayerId], params: &WalkParams) -> f64 {
        let present: Vec<NodeId> = self
            .actors()
            .iter()
            .copied()
            .filter(|actor| !self.layers_containing(*actor, layers).is_empty())
            .collect();
        if present.is_empty() {
            return f64::NAN;
        }
        let total: f64 = present
            .par_iter()
            .enumerate()
            .map(|(position, actor)| {
                let seed = mix_seed(params.rng_seed(), position as u64);
                self.estimate(*actor, layers, params, seed)
            })
            .sum();
        total / present.len() as f64
    }

    fn estimate(&self, actor: NodeId, layers: &[LayerId], params: &WalkParams, seed: u64) -> f64 {
        let visits: usize = (0..params.walks())
            .into_par_iter()
            .map(|walk| self.single_walk(actor, layers, params.steps(), seed, walk as u64))
            .sum();
        visits as f64 / params.walks() as f64
    }

    fn single_walk(
        &self,
        actor: NodeId,
        layers: &[LayerId],
        steps: usize,
        seed: u64,
        walk: u64,
    ) -> usize {
        let mut rng = unit_rng(seed, walk);
        let Some(mut layer) = self.layers_containing(actor, layers).choose(&mut rng).copied() else {
            return 0;
        };
        let mut node = actor;
        let mut visits = 1;
        for _ in 0..steps {
            let moves = self
                .layer(layer)
                .map(|store| store.neighbours(node))
                .unwrap_or_default();
            let switches: Vec<LayerId> = self
                .layers_containing(node, layers)
                .into_iter()
                .filter(|other| *other != layer)
                .collect();
            let options = moves.len() + switches.len();
            if options == 0 {
                break;
            }
            let pick = rng.gen_range(0..options);
            if let Some(next) = moves.get(pick) {
                node = *next;
            } else if let Some(next) = switches.get(pick - moves.len()) {
                layer = *next;
            }
            if node == actor {
                visits += 1;
            }
        }
        visits
    }
}
