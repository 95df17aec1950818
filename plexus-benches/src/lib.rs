//! Benchmark support crate for plexus.
//!
//! Provides seeded graph fixtures and parameter types used by the Criterion
//! benchmarks for generation, structural measures and link prediction.

pub mod error;
pub mod fixtures;
pub mod params;
