//! Monte-Carlo occupation centrality.
//!
//! A walker starts at a node and repeatedly moves to a uniformly random
//! neighbour; occupation centrality is the mean number of steps that land
//! back on the start node. Each walk owns an RNG derived from the base seed
//! and its index, so estimates are reproducible for a fixed seed whatever the
//! thread count.

use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::instrument;

use crate::{
    error::WalkError,
    node::NodeId,
    rng::{DEFAULT_RNG_SEED, mix_seed, unit_rng},
    store::GraphStore,
};

/// Step and repetition counts for occupation-centrality estimates.
///
/// # Examples
/// ```
/// use plexus_core::WalkParams;
///
/// let params = WalkParams::new(100, 20)?.with_rng_seed(1);
/// assert_eq!(params.steps(), 100);
/// # Ok::<(), plexus_core::WalkError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkParams {
    steps: usize,
    walks: usize,
    rng_seed: u64,
}

impl WalkParams {
    /// Validates the walk length and repetition count.
    ///
    /// # Errors
    /// Returns [`WalkError::InvalidParameters`] when either count is zero.
    pub fn new(steps: usize, walks: usize) -> Result<Self, WalkError> {
        if steps == 0 {
            return Err(WalkError::InvalidParameters {
                reason: "steps must be greater than zero".into(),
            });
        }
        if walks == 0 {
            return Err(WalkError::InvalidParameters {
                reason: "walks must be greater than zero".into(),
            });
        }
        Ok(Self {
            steps,
            walks,
            rng_seed: DEFAULT_RNG_SEED,
        })
    }

    /// Seeds the walk RNGs.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Steps per walk.
    #[rustfmt::skip]
    #[must_use]
    pub fn steps(&self) -> usize { self.steps }

    /// Independent walks averaged per estimate.
    #[rustfmt::skip]
    #[must_use]
    pub fn walks(&self) -> usize { self.walks }

    /// Base seed for the per-walk RNGs.
    #[rustfmt::skip]
    #[must_use]
    pub fn rng_seed(&self) -> u64 { self.rng_seed }
}

/// Estimates the occupation centrality of `node`.
///
/// The starting position is not counted; only the `steps` moves are. A walk
/// that reaches a node without neighbours stops early.
///
/// # Errors
/// Returns [`WalkError::UnknownNode`] when `node` is absent.
#[instrument(
    name = "walk.occupation_centrality",
    skip(graph, params),
    fields(node = %node, steps = params.steps(), walks = params.walks()),
    err
)]
pub fn occupation_centrality(
    graph: &GraphStore,
    node: NodeId,
    params: &WalkParams,
) -> Result<f64, WalkError> {
    if !graph.has_node(node) {
        return Err(WalkError::UnknownNode { node });
    }
    Ok(estimate(graph, node, params, params.rng_seed()))
}

/// Mean occupation centrality over every node, computed in parallel.
///
/// Empty graphs yield `NaN`.
#[instrument(
    name = "walk.average_occupation_centrality",
    skip(graph, params),
    fields(nodes = graph.node_count(), steps = params.steps(), walks = params.walks())
)]
#[must_use]
pub fn average_occupation_centrality(graph: &GraphStore, params: &WalkParams) -> f64 {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return f64::NAN;
    }
    let total: f64 = nodes
        .par_iter()
        .enumerate()
        .map(|(position, node)| {
            let seed = mix_seed(params.rng_seed(), position as u64);
            estimate(graph, *node, params, seed)
        })
        .sum();
    total / nodes.len() as f64
}

fn estimate(graph: &GraphStore, start: NodeId, params: &WalkParams, seed: u64) -> f64 {
    let returns: usize = (0..params.walks())
        .into_par_iter()
        .map(|walk| single_walk(graph, start, params.steps(), seed, walk as u64))
        .sum();
    record_walk_steps(params.steps() * params.walks());
    returns as f64 / params.walks() as f64
}

fn single_walk(graph: &GraphStore, start: NodeId, steps: usize, seed: u64, walk: u64) -> usize {
    let mut rng = unit_rng(seed, walk);
    let mut current = start;
    let mut returns = 0;
    for _ in 0..steps {
        let neighbours = graph.neighbours(current);
        let Some(next) = neighbours.choose(&mut rng) else {
            break;
        };
        current = *next;
        if current == start {
            returns += 1;
        }
    }
    returns
}

#[cfg(feature = "metrics")]
fn record_walk_steps(steps: usize) {
    metrics::counter!("plexus_walk_steps_total").increment(steps as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_walk_steps(_steps: usize) {}

#[cfg(test)]
mod tests;
