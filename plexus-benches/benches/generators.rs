//! Random graph generation benchmarks.
//!
//! Measures Barabási–Albert attachment and Watts–Strogatz lattice rewiring
//! at increasing node counts.
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use plexus_benches::{
    error::BenchSetupError,
    fixtures::{REWIRE_PROBABILITY, SEED},
    params::GraphBenchParams,
};
use plexus_core::{BarabasiAlbert, NoProgress, WattsStrogatz};

/// Node counts to benchmark.
const NODE_COUNTS: &[usize] = &[500, 2_000, 8_000];

/// Edges per node for attachment and lattice degree for rewiring.
const DEGREE: usize = 4;

fn generators_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    for &node_count in NODE_COUNTS {
        let params = GraphBenchParams {
            node_count,
            degree: DEGREE,
        };
        let attachment = BarabasiAlbert::new(node_count, DEGREE + 1, DEGREE)?.with_rng_seed(SEED);
        group.bench_with_input(
            BenchmarkId::new("barabasi_albert", params),
            &attachment,
            |b, model| b.iter(|| model.generate(&NoProgress)),
        );

        let rewiring =
            WattsStrogatz::new(node_count, DEGREE, REWIRE_PROBABILITY)?.with_rng_seed(SEED);
        group.bench_with_input(
            BenchmarkId::new("watts_strogatz", params),
            &rewiring,
            |b, model| b.iter(|| model.generate(&NoProgress)),
        );
    }

    group.finish();
    Ok(())
}

fn generators(c: &mut Criterion) {
    if let Err(err) = generators_impl(c) {
        panic!("generator benchmark setup failed: {err}");
    }
}

criterion_group!(benches, generators);
criterion_main!(benches);
