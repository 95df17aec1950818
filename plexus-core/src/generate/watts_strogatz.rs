//! Watts–Strogatz small-world rewiring.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use rayon::prelude::*;
use tracing::{info, instrument};

use super::{MAX_GENERATOR_SIZE, MAX_LATTICE_DEGREE, check_range, percent, record_generated_edges};
use crate::{
    error::GeneratorError,
    node::NodeId,
    progress::ProgressSink,
    rng::DEFAULT_RNG_SEED,
    store::{GraphConfig, GraphStore},
};

/// Phase emitted while the ring lattice is built.
pub const PHASE_LATTICE: &str = "generating lattice";
/// Phase emitted while lattice edges are rewired.
pub const PHASE_REWIRING: &str = "rewiring edges";
/// Phase emitted once the graph is complete.
pub const PHASE_WATTS_STROGATZ_DONE: &str = "watts-strogatz graph created";

/// Small-world generator: a ring lattice whose edges are randomly rewired.
///
/// # Examples
/// ```
/// use plexus_core::{NoProgress, WattsStrogatz};
///
/// let graph = WattsStrogatz::new(10, 4, 0.0)?.generate(&NoProgress);
/// assert_eq!(graph.edge_count(), 20);
/// # Ok::<(), plexus_core::GeneratorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct WattsStrogatz {
    nodes: usize,
    lattice_degree: usize,
    rewire_probability: f64,
    rng_seed: u64,
}

impl WattsStrogatz {
    /// Validates the model parameters.
    ///
    /// # Errors
    /// Returns [`GeneratorError::InvalidParameters`] when `nodes` exceeds
    /// `1_000_000`, when `lattice_degree` is odd or outside `2..=1_000`, or when
    /// `rewire_probability` is not a probability.
    pub fn new(
        nodes: usize,
        lattice_degree: usize,
        rewire_probability: f64,
    ) -> Result<Self, GeneratorError> {
        check_range("nodes", nodes, 0, MAX_GENERATOR_SIZE)?;
        check_range("lattice_degree", lattice_degree, 2, MAX_LATTICE_DEGREE)?;
        if lattice_degree % 2 != 0 {
            return Err(GeneratorError::InvalidParameters {
                parameter: "lattice_degree",
                reason: format!("{lattice_degree} must be even"),
            });
        }
        if !(0.0..=1.0).contains(&rewire_probability) {
            return Err(GeneratorError::InvalidParameters {
                parameter: "rewire_probability",
                reason: format!("{rewire_probability} is outside [0, 1]"),
            });
        }
        Ok(Self {
            nodes,
            lattice_degree,
            rewire_probability,
            rng_seed: DEFAULT_RNG_SEED,
        })
    }

    /// Seeds the generator's RNG.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Final node count.
    #[rustfmt::skip]
    #[must_use]
    pub fn nodes(&self) -> usize { self.nodes }

    /// Number of lattice neighbours per node before rewiring.
    #[rustfmt::skip]
    #[must_use]
    pub fn lattice_degree(&self) -> usize { self.lattice_degree }

    /// Probability that a lattice edge is rewired.
    #[rustfmt::skip]
    #[must_use]
    pub fn rewire_probability(&self) -> f64 { self.rewire_probability }

    /// Generates a fresh unweighted graph.
    #[must_use]
    pub fn generate(&self, progress: &dyn ProgressSink) -> GraphStore {
        let graph = GraphStore::with_config(GraphConfig::unweighted());
        self.populate(&graph, progress);
        graph
    }

    /// Fills `graph`, which is expected to be empty, with a rewired ring
    /// lattice on nodes `0..nodes`.
    ///
    /// Lattice construction reports 0–50% and rewiring 50–100%. Degrees are
    /// recomputed once rewiring finishes.
    #[instrument(
        name = "generate.watts_strogatz",
        skip(self, graph, progress),
        fields(
            nodes = self.nodes,
            lattice_degree = self.lattice_degree,
            rewire_probability = self.rewire_probability,
            rewired = tracing::field::Empty,
        )
    )]
    pub fn populate(&self, graph: &GraphStore, progress: &dyn ProgressSink) {
        progress.on_phase(PHASE_LATTICE);
        info!(phase = PHASE_LATTICE, "generator phase started");
        self.build_lattice(graph, progress);

        progress.on_phase(PHASE_REWIRING);
        info!(phase = PHASE_REWIRING, "generator phase started");
        let rewired = self.rewire(graph, progress);
        tracing::Span::current().record("rewired", rewired);

        graph.recompute_degrees();
        progress.on_progress(100.0);
        progress.on_phase(PHASE_WATTS_STROGATZ_DONE);
        let edges = graph.edge_count();
        record_generated_edges("watts_strogatz", edges);
        info!(edges, rewired, "watts-strogatz generation complete");
    }

    fn build_lattice(&self, graph: &GraphStore, progress: &dyn ProgressSink) {
        for index in 0..self.nodes {
            graph.add_node(NodeId::new(index as u64));
        }
        let half = self.lattice_degree / 2;
        let finished = AtomicUsize::new(0);
        (0..self.nodes).into_par_iter().for_each(|index| {
            for offset in 1..=half {
                let neighbour = (index + offset) % self.nodes;
                // Lattices wider than the ring wrap onto the node itself.
                if neighbour != index {
                    graph.add_undirected_edge(
                        NodeId::new(index as u64),
                        NodeId::new(neighbour as u64),
                        1.0,
                    );
                }
            }
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            progress.on_progress(percent(done, self.nodes) / 2.0);
        });
    }

    fn rewire(&self, graph: &GraphStore, progress: &dyn ProgressSink) -> usize {
        let mut rng = SmallRng::seed_from_u64(self.rng_seed);
        let nodes = graph.nodes();
        let mut rewired = 0;
        for (position, &node) in nodes.iter().enumerate() {
            progress.on_progress(50.0 + percent(position, nodes.len()) / 2.0);
            let snapshot = graph.neighbours(node);
            let original: HashSet<NodeId> = snapshot.iter().copied().collect();
            for &old in &snapshot {
                if !rng.gen_bool(self.rewire_probability) {
                    continue;
                }
                let Some(target) = pick_target(graph, &mut rng, &nodes, node, &original) else {
                    continue;
                };
                graph.remove_undirected_edge(node, old);
                graph.add_undirected_edge(node, target, 1.0);
                rewired += 1;
            }
        }
        rewired
    }
}

/// Draws a uniform replacement target for `node`, rejecting the node itself,
/// its neighbours at snapshot time and anything it is already connected to.
///
/// Returns `None` when every node is rejected.
fn pick_target(
    graph: &GraphStore,
    rng: &mut SmallRng,
    nodes: &[NodeId],
    node: NodeId,
    original: &HashSet<NodeId>,
) -> Option<NodeId> {
    let mut blocked = graph.neighbour_set(node);
    blocked.extend(original.iter().copied());
    blocked.insert(node);
    if blocked.len() >= nodes.len() {
        return None;
    }
    loop {
        let candidate = *nodes.choose(rng)?;
        if !blocked.contains(&candidate) {
            return Some(candidate);
        }
    }
}
