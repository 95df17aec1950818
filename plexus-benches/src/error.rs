//! Benchmark setup error type.

use plexus_core::{GeneratorError, WalkError};

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Generator parameters were rejected.
    #[error("graph generation failed: {0}")]
    Generator(#[from] GeneratorError),
    /// Walk parameters were rejected.
    #[error("walk setup failed: {0}")]
    Walk(#[from] WalkError),
}
