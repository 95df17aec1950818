//! Barabási–Albert preferential attachment.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use super::{MAX_GENERATOR_SIZE, check_range, percent, record_generated_edges};
use crate::{
    error::GeneratorError,
    node::NodeId,
    progress::ProgressSink,
    rng::DEFAULT_RNG_SEED,
    store::{GraphConfig, GraphStore},
};

/// Phase emitted when new nodes start attaching to the seed graph.
pub const PHASE_ATTACHING: &str = "attaching nodes";
/// Phase emitted once the graph is complete.
pub const PHASE_BARABASI_ALBERT_DONE: &str = "barabási-albert graph created";

/// Random draws per missing edge before the fallback attachment gives up.
const FALLBACK_ATTEMPTS_PER_NODE: usize = 64;

/// Preferential attachment generator.
///
/// Starts from a complete graph on `seed_nodes` nodes and attaches each
/// further node to `edges_per_node` existing nodes chosen with probability
/// proportional to their degree.
///
/// # Examples
/// ```
/// use plexus_core::{BarabasiAlbert, NoProgress};
///
/// let generator = BarabasiAlbert::new(20, 3, 2)?.with_rng_seed(9);
/// let graph = generator.generate(&NoProgress);
/// assert_eq!(graph.node_count(), 20);
/// # Ok::<(), plexus_core::GeneratorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BarabasiAlbert {
    nodes: usize,
    seed_nodes: usize,
    edges_per_node: usize,
    rng_seed: u64,
}

impl BarabasiAlbert {
    /// Validates the model parameters.
    ///
    /// # Errors
    /// Returns [`GeneratorError::InvalidParameters`] when any count lies
    /// outside `1..=1_000_000` or when `nodes < seed_nodes`.
    pub fn new(
        nodes: usize,
        seed_nodes: usize,
        edges_per_node: usize,
    ) -> Result<Self, GeneratorError> {
        check_range("nodes", nodes, 1, MAX_GENERATOR_SIZE)?;
        check_range("seed_nodes", seed_nodes, 1, MAX_GENERATOR_SIZE)?;
        check_range("edges_per_node", edges_per_node, 1, MAX_GENERATOR_SIZE)?;
        if nodes < seed_nodes {
            return Err(GeneratorError::InvalidParameters {
                parameter: "nodes",
                reason: format!("{nodes} must be at least seed_nodes ({seed_nodes})"),
            });
        }
        Ok(Self {
            nodes,
            seed_nodes,
            edges_per_node,
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

    /// Size of the complete seed graph.
    #[rustfmt::skip]
    #[must_use]
    pub fn seed_nodes(&self) -> usize { self.seed_nodes }

    /// Edges added for every node beyond the seed graph.
    #[rustfmt::skip]
    #[must_use]
    pub fn edges_per_node(&self) -> usize { self.edges_per_node }

    /// Generates a fresh unweighted graph.
    #[must_use]
    pub fn generate(&self, progress: &dyn ProgressSink) -> GraphStore {
        let graph = GraphStore::with_config(GraphConfig::unweighted());
        self.populate(&graph, progress);
        graph
    }

    /// Fills `graph`, which is expected to be empty, with a preferential
    /// attachment graph on nodes `0..nodes`.
    ///
    /// The degree cache is kept current throughout generation.
    #[instrument(
        name = "generate.barabasi_albert",
        skip(self, graph, progress),
        fields(
            nodes = self.nodes,
            seed_nodes = self.seed_nodes,
            edges_per_node = self.edges_per_node,
        )
    )]
    pub fn populate(&self, graph: &GraphStore, progress: &dyn ProgressSink) {
        let mut rng = SmallRng::seed_from_u64(self.rng_seed);
        seed_complete_graph(graph, self.seed_nodes);

        progress.on_phase(PHASE_ATTACHING);
        info!(phase = PHASE_ATTACHING, "generator phase started");

        let mut fallback_edges = 0_usize;
        for index in self.seed_nodes..self.nodes {
            progress.on_progress(percent(index, self.nodes));
            fallback_edges += self.attach_node(graph, &mut rng, index);
        }

        progress.on_progress(100.0);
        progress.on_phase(PHASE_BARABASI_ALBERT_DONE);
        let edges = graph.edge_count();
        record_generated_edges("barabasi_albert", edges);
        info!(edges, fallback_edges, "barabási-albert generation complete");
    }

    /// Attaches node `index` and returns how many edges the fallback added.
    fn attach_node(&self, graph: &GraphStore, rng: &mut SmallRng, index: usize) -> usize {
        let snapshot = graph.nodes();
        let degree_sum: usize = snapshot
            .iter()
            .map(|node| graph.degree(*node).unwrap_or(0))
            .sum();
        let degree_sum = degree_sum.max(1) as f64;

        let new_node = NodeId::new(index as u64);
        graph.add_node(new_node);
        graph.set_degree(new_node, 0);

        let mut attached = 0;
        for &candidate in &snapshot {
            if attached >= self.edges_per_node {
                break;
            }
            let degree = graph.degree(candidate).unwrap_or(0) as f64;
            let probability = (degree / degree_sum).clamp(0.0, 1.0);
            if rng.gen_bool(probability) && connect(graph, candidate, new_node) {
                attached += 1;
            }
        }

        // The drawn index is used directly as a node identifier rather than
        // as a position in `snapshot`. With dense ids `0..index` both agree;
        // otherwise draws may miss and the node ends up under-connected.
        let target = self.edges_per_node.min(snapshot.len());
        let mut fallback = 0;
        let mut attempts = FALLBACK_ATTEMPTS_PER_NODE * snapshot.len().max(1);
        while attached < target && attempts > 0 {
            attempts -= 1;
            let candidate = NodeId::new(rng.gen_range(0..snapshot.len()) as u64);
            if connect(graph, candidate, new_node) {
                attached += 1;
                fallback += 1;
            }
        }
        if attached < target {
            debug!(node = index, attached, target, "fallback attachment gave up");
        }
        fallback
    }
}

fn seed_complete_graph(graph: &GraphStore, seed_nodes: usize) {
    for index in 0..seed_nodes {
        graph.add_node(NodeId::new(index as u64));
    }
    (0..seed_nodes).into_par_iter().for_each(|left| {
        for right in (left + 1)..seed_nodes {
            graph.add_undirected_edge(NodeId::new(left as u64), NodeId::new(right as u64), 1.0);
        }
    });
    graph.recompute_degrees();
}

fn connect(graph: &GraphStore, existing: NodeId, new_node: NodeId) -> bool {
    if !graph.add_undirected_edge(existing, new_node, 1.0).is_inserted() {
        return false;
    }
    graph.increment_degree(existing);
    graph.increment_degree(new_node);
    true
}
