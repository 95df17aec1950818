//! Random graph generators.
//!
//! Both generators fill a caller-supplied [`crate::GraphStore`] and report
//! progress through an explicit [`crate::ProgressSink`]. Parameters are
//! validated up front; generation itself cannot fail.

mod barabasi_albert;
mod watts_strogatz;

pub use barabasi_albert::{BarabasiAlbert, PHASE_ATTACHING, PHASE_BARABASI_ALBERT_DONE};
pub use watts_strogatz::{PHASE_LATTICE, PHASE_REWIRING, PHASE_WATTS_STROGATZ_DONE, WattsStrogatz};

use crate::error::GeneratorError;

/// Largest node count or attachment count accepted by the generators.
pub const MAX_GENERATOR_SIZE: usize = 1_000_000;

/// Largest lattice degree accepted by [`WattsStrogatz`].
pub const MAX_LATTICE_DEGREE: usize = 1_000;

fn check_range(
    parameter: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), GeneratorError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(GeneratorError::InvalidParameters {
        parameter,
        reason: format!("{value} is outside {min}..={max}"),
    })
}

fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    done as f64 / total as f64 * 100.0
}

#[cfg(feature = "metrics")]
fn record_generated_edges(model: &'static str, edges: usize) {
    metrics::counter!("plexus_generated_edges_total", "model" => model)
        .increment(edges as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_generated_edges(_model: &'static str, _edges: usize) {}
