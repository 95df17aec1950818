//! Single-graph and layered edge files.

use std::{io::BufRead, num::NonZeroU64, path::Path};

use plexus_core::{GraphConfig, GraphStore, LayerId, MultilayerGraph, NodeId};
use tracing::{debug, instrument};

use crate::{
    TextProviderError,
    records::{Records, open},
};

const EDGE_LIST_COMMENTS: &[char] = &['%', '#'];
const LAYERED_COMMENTS: &[char] = &['%'];

/// Reads `from to [weight]` lines into one store.
///
/// Lines starting with `%` or `#` are comments. A missing weight counts as
/// `1.0`. `name` identifies the source in errors.
///
/// # Errors
/// Returns [`TextProviderError::Parse`] or [`TextProviderError::MissingField`]
/// for malformed lines and [`TextProviderError::Io`] when reading fails.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use plexus_core::{GraphConfig, NodeId};
/// use plexus_providers_text::read_edge_list;
///
/// let graph = read_edge_list("demo", Cursor::new("# karate\n1 2\n2 3 0.5\n"), GraphConfig::new())?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_weight(NodeId::new(3), NodeId::new(2)), Some(0.5));
/// # Ok::<(), plexus_providers_text::TextProviderError>(())
/// ```
#[instrument(name = "text.edge_list", skip(reader, config), fields(edges = tracing::field::Empty), err)]
pub fn read_edge_list<R: BufRead>(
    name: &str,
    reader: R,
    config: GraphConfig,
) -> Result<GraphStore, TextProviderError> {
    let graph = GraphStore::with_config(config);
    let mut records = Records::new(name, reader, EDGE_LIST_COMMENTS);
    while let Some(mut record) = records.next_record()? {
        let from = NodeId::new(record.field("from")?);
        let to = NodeId::new(record.field("to")?);
        let weight = record.optional_field("weight")?.unwrap_or(1.0);
        graph.add_node(from);
        graph.add_node(to);
        graph.add_edge(from, to, weight);
    }
    graph.recompute_degrees();
    tracing::Span::current().record("edges", graph.edge_count());
    Ok(graph)
}

/// [`read_edge_list`] over a file.
///
/// # Errors
/// Returns [`TextProviderError::NotFound`] when `path` does not exist, plus
/// every [`read_edge_list`] error.
pub fn load_edge_list(path: &Path, config: GraphConfig) -> Result<GraphStore, TextProviderError> {
    read_edge_list(&path.to_string_lossy(), open(path)?, config)
}

/// Reads `layer from to weight` lines into a multilayer graph.
///
/// Lines starting with `%` are comments. Repeated edges accumulate weight in
/// weighted configurations.
///
/// # Errors
/// Returns [`TextProviderError::Parse`] or [`TextProviderError::MissingField`]
/// for malformed lines and [`TextProviderError::Io`] when reading fails.
#[instrument(name = "text.multilayer", skip(reader, config), fields(layers = tracing::field::Empty), err)]
pub fn read_multilayer<R: BufRead>(
    name: &str,
    reader: R,
    config: GraphConfig,
) -> Result<MultilayerGraph, TextProviderError> {
    let mut graph = MultilayerGraph::new(config);
    let mut records = Records::new(name, reader, LAYERED_COMMENTS);
    while let Some(mut record) = records.next_record()? {
        let layer = LayerId::new(record.field("layer")?);
        let from = NodeId::new(record.field("from")?);
        let to = NodeId::new(record.field("to")?);
        let weight = record.field("weight")?;
        graph.add_edge(layer, from, to, weight);
    }
    refresh_degrees(&graph);
    tracing::Span::current().record("layers", graph.layer_count());
    Ok(graph)
}

/// [`read_multilayer`] over a file.
///
/// # Errors
/// Returns [`TextProviderError::NotFound`] when `path` does not exist, plus
/// every [`read_multilayer`] error.
pub fn load_multilayer(
    path: &Path,
    config: GraphConfig,
) -> Result<MultilayerGraph, TextProviderError> {
    read_multilayer(&path.to_string_lossy(), open(path)?, config)
}

/// Bucketing of a timestamped edge stream into layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemporalOptions {
    step: NonZeroU64,
    cumulative: bool,
    config: GraphConfig,
}

impl TemporalOptions {
    /// Groups edges into layers spanning `step` timestamp units.
    ///
    /// # Errors
    /// Returns [`TextProviderError::InvalidStep`] when `step` is zero.
    pub fn new(step: u64) -> Result<Self, TextProviderError> {
        let step = NonZeroU64::new(step).ok_or(TextProviderError::InvalidStep)?;
        Ok(Self {
            step,
            cumulative: false,
            config: GraphConfig::new(),
        })
    }

    /// Makes every layer include the edges of all earlier layers.
    #[must_use]
    pub const fn with_cumulative(mut self, cumulative: bool) -> Self {
        self.cumulative = cumulative;
        self
    }

    /// Structural flags of the produced layers.
    #[must_use]
    pub const fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Timestamp units per layer.
    #[rustfmt::skip]
    #[must_use]
    pub const fn step(&self) -> u64 { self.step.get() }

    /// Whether layers are cumulative.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_cumulative(&self) -> bool { self.cumulative }
}

/// Reads `from to weight timestamp` lines into layers keyed by
/// `(timestamp - first_timestamp) / step`.
///
/// The first data line fixes the origin; earlier timestamps fall into layer
/// `0`. Lines starting with `%` are comments.
///
/// # Errors
/// Returns [`TextProviderError::Parse`] or [`TextProviderError::MissingField`]
/// for malformed lines and [`TextProviderError::Io`] when reading fails.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use plexus_core::LayerId;
/// use plexus_providers_text::{TemporalOptions, read_temporal};
///
/// let stream = "1 2 1.0 100\n2 3 1.0 150\n3 4 1.0 260\n";
/// let graph = read_temporal("messages", Cursor::new(stream), &TemporalOptions::new(100)?)?;
/// assert_eq!(graph.layer_ids(), vec![LayerId::new(0), LayerId::new(1)]);
/// # Ok::<(), plexus_providers_text::TextProviderError>(())
/// ```
#[instrument(
    name = "text.temporal",
    skip(reader, options),
    fields(step = options.step(), cumulative = options.is_cumulative(), layers = tracing::field::Empty),
    err
)]
pub fn read_temporal<R: BufRead>(
    name: &str,
    reader: R,
    options: &TemporalOptions,
) -> Result<MultilayerGraph, TextProviderError> {
    let mut graph = MultilayerGraph::new(options.config);
    let mut records = Records::new(name, reader, LAYERED_COMMENTS);
    let mut origin = None;
    while let Some(mut record) = records.next_record()? {
        let from = NodeId::new(record.field("from")?);
        let to = NodeId::new(record.field("to")?);
        let weight = record.field("weight")?;
        let timestamp: u64 = record.field("timestamp")?;
        let first = *origin.get_or_insert(timestamp);
        let layer = LayerId::new(timestamp.saturating_sub(first) / options.step());
        graph.add_edge(layer, from, to, weight);
    }
    if options.cumulative {
        graph = graph.cumulative();
    }
    refresh_degrees(&graph);
    debug!(origin = ?origin, "temporal stream bucketed");
    tracing::Span::current().record("layers", graph.layer_count());
    Ok(graph)
}

/// [`read_temporal`] over a file.
///
/// # Errors
/// Returns [`TextProviderError::NotFound`] when `path` does not exist, plus
/// every [`read_temporal`] error.
pub fn load_temporal(
    path: &Path,
    options: &TemporalOptions,
) -> Result<MultilayerGraph, TextProviderError> {
    read_temporal(&path.to_string_lossy(), open(path)?, options)
}

pub(crate) fn refresh_degrees(graph: &MultilayerGraph) {
    for (_, store) in graph.layers() {
        store.recompute_degrees();
    }
}
