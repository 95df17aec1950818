//! Seeded graphs shared by the benchmarks.

use plexus_core::{BarabasiAlbert, GraphStore, NoProgress, WattsStrogatz};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// Seed used for every generated fixture.
pub const SEED: u64 = 42;

/// Rewiring probability of the small-world fixture.
pub const REWIRE_PROBABILITY: f64 = 0.1;

/// Scale-free graph whose seed graph is one node larger than `degree`.
///
/// # Errors
/// Returns [`BenchSetupError::Generator`] when the parameters are rejected.
pub fn scale_free(params: GraphBenchParams) -> Result<GraphStore, BenchSetupError> {
    let graph = BarabasiAlbert::new(
        params.node_count,
        params.degree.saturating_add(1),
        params.degree,
    )?
    .with_rng_seed(SEED)
    .generate(&NoProgress);
    graph.recompute_degrees();
    Ok(graph)
}

/// Small-world graph rewired with [`REWIRE_PROBABILITY`].
///
/// # Errors
/// Returns [`BenchSetupError::Generator`] when the parameters are rejected.
pub fn small_world(params: GraphBenchParams) -> Result<GraphStore, BenchSetupError> {
    let graph = WattsStrogatz::new(params.node_count, params.degree, REWIRE_PROBABILITY)?
        .with_rng_seed(SEED)
        .generate(&NoProgress);
    graph.recompute_degrees();
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixtures_are_reproducible() -> Result<(), BenchSetupError> {
        let params = GraphBenchParams {
            node_count: 50,
            degree: 4,
        };
        assert_eq!(small_world(params)?.edges(), small_world(params)?.edges());
        assert_eq!(scale_free(params)?.edges(), scale_free(params)?.edges());
        Ok(())
    }

    #[rstest]
    fn odd_lattice_degrees_are_rejected() {
        let params = GraphBenchParams {
            node_count: 50,
            degree: 3,
        };
        assert!(matches!(
            small_world(params),
            Err(BenchSetupError::Generator(_))
        ));
    }
}
