//! Seed selection and independent-cascade spreading.
//!
//! Candidates are well-connected nodes whose neighbourhoods are loosely knit:
//! high degree and low clustering. The cascade then activates neighbours of
//! newly active nodes with a fixed probability until no new node activates.

use std::collections::HashSet;

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    error::InfluenceError,
    measures::clustering_coefficient,
    node::NodeId,
    rng::{DEFAULT_RNG_SEED, unit_rng},
    store::GraphStore,
};

/// Filters for [`select_seed_candidates`].
///
/// # Examples
/// ```
/// use plexus_core::CandidateCriteria;
///
/// let criteria = CandidateCriteria::new(3)?
///     .with_degree_percentile(0.75)?
///     .with_clustering_threshold(0.5);
/// assert_eq!(criteria.max_candidates(), 3);
/// # Ok::<(), plexus_core::InfluenceError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateCriteria {
    max_candidates: usize,
    degree_percentile: f64,
    clustering_threshold: f64,
}

impl CandidateCriteria {
    /// Keeps at most `max_candidates` nodes, with the 90th degree percentile
    /// and a clustering threshold of 0.3.
    ///
    /// # Errors
    /// Returns [`InfluenceError::InvalidParameters`] when `max_candidates` is
    /// zero.
    pub fn new(max_candidates: usize) -> Result<Self, InfluenceError> {
        if max_candidates == 0 {
            return Err(InfluenceError::InvalidParameters {
                parameter: "max_candidates",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(Self {
            max_candidates,
            degree_percentile: 0.9,
            clustering_threshold: 0.3,
        })
    }

    /// Sets the degree percentile, as a fraction in `[0, 1]`, a node must
    /// reach.
    ///
    /// # Errors
    /// Returns [`InfluenceError::InvalidParameters`] outside `[0, 1]`.
    pub fn with_degree_percentile(mut self, percentile: f64) -> Result<Self, InfluenceError> {
        check_unit_interval("degree_percentile", percentile)?;
        self.degree_percentile = percentile;
        Ok(self)
    }

    /// Sets the largest clustering coefficient a candidate may have.
    #[must_use]
    pub const fn with_clustering_threshold(mut self, threshold: f64) -> Self {
        self.clustering_threshold = threshold;
        self
    }

    /// Upper bound on returned candidates.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max_candidates(&self) -> usize { self.max_candidates }

    /// Degree percentile as a fraction.
    #[rustfmt::skip]
    #[must_use]
    pub const fn degree_percentile(&self) -> f64 { self.degree_percentile }

    /// Largest accepted clustering coefficient.
    #[rustfmt::skip]
    #[must_use]
    pub const fn clustering_threshold(&self) -> f64 { self.clustering_threshold }
}

/// Nodes whose degree reaches the configured percentile and whose clustering
/// coefficient does not exceed the threshold.
///
/// Results are ordered by ascending clustering coefficient, then by
/// descending degree, then by insertion order, and truncated to
/// `max_candidates`.
#[instrument(name = "influence.select_candidates", skip(graph, criteria), fields(nodes = graph.node_count()))]
#[must_use]
pub fn select_seed_candidates(graph: &GraphStore, criteria: &CandidateCriteria) -> Vec<NodeId> {
    let nodes = graph.nodes();
    let degrees: Vec<usize> = nodes.iter().map(|node| graph.neighbour_count(*node)).collect();
    let Some(cutoff) = percentile(&degrees, criteria.degree_percentile()) else {
        return Vec::new();
    };
    let mut scored: Vec<(f64, usize, usize, NodeId)> = nodes
        .par_iter()
        .zip(degrees.par_iter())
        .enumerate()
        .filter(|(_, (_, degree))| **degree as f64 >= cutoff)
        .map(|(position, (node, degree))| {
            (clustering_coefficient(graph, *node), *degree, position, *node)
        })
        .filter(|(clustering, ..)| *clustering <= criteria.clustering_threshold())
        .collect();
    scored.sort_by(|left, right| {
        left.0
            .total_cmp(&right.0)
            .then(right.1.cmp(&left.1))
            .then(left.2.cmp(&right.2))
    });
    scored
        .into_iter()
        .take(criteria.max_candidates())
        .map(|(.., node)| node)
        .collect()
}

/// Result of an independent-cascade run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cascade {
    /// Nodes ever activated, seeds included.
    pub activated: usize,
    /// Rounds in which at least one node was active.
    pub rounds: usize,
    /// `activated / node_count`, `NaN` for an empty graph.
    pub fraction: f64,
}

/// Runs an independent cascade from `seeds`.
///
/// Every node activated in a round gets one chance to activate each still
/// inactive neighbour with `probability`. Unknown seeds are ignored. The
/// same `rng_seed` replays the same cascade.
///
/// # Errors
/// Returns [`InfluenceError::InvalidParameters`] when `probability` is not a
/// finite value in `[0, 1]`.
#[instrument(
    name = "influence.independent_cascade",
    skip(graph, seeds),
    fields(seeds = seeds.len(), activated = tracing::field::Empty),
    err
)]
pub fn independent_cascade(
    graph: &GraphStore,
    seeds: &[NodeId],
    probability: f64,
    rng_seed: u64,
) -> Result<Cascade, InfluenceError> {
    check_unit_interval("probability", probability)?;
    let mut rng = unit_rng(rng_seed, 0);
    let mut active: HashSet<NodeId> = HashSet::new();
    let mut frontier: Vec<NodeId> = seeds
        .iter()
        .copied()
        .filter(|seed| graph.has_node(*seed) && active.insert(*seed))
        .collect();
    let mut rounds = 0;
    while !frontier.is_empty() {
        rounds += 1;
        let mut next = Vec::new();
        for node in &frontier {
            for neighbour in graph.neighbours(*node) {
                if !active.contains(&neighbour) && rng.gen_bool(probability) {
                    active.insert(neighbour);
                    next.push(neighbour);
                }
            }
        }
        debug!(round = rounds, newly_active = next.len(), "cascade round finished");
        frontier = next;
    }
    tracing::Span::current().record("activated", active.len());
    let nodes = graph.node_count();
    let fraction = if nodes == 0 {
        f64::NAN
    } else {
        active.len() as f64 / nodes as f64
    };
    Ok(Cascade {
        activated: active.len(),
        rounds,
        fraction,
    })
}

/// [`independent_cascade`] seeded with [`select_seed_candidates`] and the
/// default RNG seed.
///
/// # Errors
/// Propagates [`independent_cascade`] parameter errors.
pub fn cascade_from_candidates(
    graph: &GraphStore,
    criteria: &CandidateCriteria,
    probability: f64,
) -> Result<Cascade, InfluenceError> {
    let seeds = select_seed_candidates(graph, criteria);
    independent_cascade(graph, &seeds, probability, DEFAULT_RNG_SEED)
}

/// Linear-interpolation percentile of `values`; `None` when empty.
fn percentile(values: &[usize], fraction: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let last = sorted.len().checked_sub(1)?;
    let rank = fraction * last as f64;
    let lower = rank.floor();
    let below = *sorted.get(lower as usize)? as f64;
    let above = *sorted.get(rank.ceil() as usize)? as f64;
    Some(below + (above - below) * (rank - lower))
}

fn check_unit_interval(parameter: &'static str, value: f64) -> Result<(), InfluenceError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(InfluenceError::InvalidParameters {
        parameter,
        reason: format!("{value} is outside [0, 1]"),
    })
}
