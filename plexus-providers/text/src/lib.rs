//! Text loaders and exporters for plexus graphs.
//!
//! Loaders read whitespace-separated records and come in pairs: a `read_*`
//! function over any [`std::io::BufRead`] and a `load_*` function that opens
//! a file. Malformed numbers fail the load with the offending line; a
//! missing file is reported separately as [`TextProviderError::NotFound`].
//!
//! Supported inputs:
//! - plain edge lists, `from to [weight]`
//! - layered edge files, `layer from to weight`
//! - timestamped edge streams, `from to weight timestamp`
//! - simplex datasets split over times, counts and vertex files
//!
//! Exporters write edge lists, adjacency lists, layer summaries and
//! actor-by-layer tables.

mod edges;
mod error;
mod export;
mod records;
mod simplex;

pub use edges::{
    TemporalOptions, load_edge_list, load_multilayer, load_temporal, read_edge_list,
    read_multilayer, read_temporal,
};
pub use error::{TextProviderError, TextProviderErrorCode};
pub use export::{write_actor_table, write_adjacency_list, write_edge_list, write_layer_summaries};
pub use simplex::{SimplexFiles, SimplexOptions, SimplexReaders, load_simplices, read_simplices};
