//! Timestamped simplices collapsed into coalesced co-occurrence layers.
//!
//! The input is three aligned sources: one time per simplex, one vertex count
//! per simplex, and the flat vertex stream. Every simplex becomes a clique in
//! the layer of its year, and consecutive years are then merged into windows.

use std::{
    io::BufRead,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use plexus_core::{GraphConfig, LayerId, MultilayerGraph, NodeId};
use tracing::{info, instrument, warn};

use crate::{
    TextProviderError,
    edges::refresh_degrees,
    records::{Records, open},
};

const COMMENTS: &[char] = &['%'];

/// Year bound and window length for simplex ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimplexOptions {
    max_year: u64,
    window: NonZeroUsize,
}

impl SimplexOptions {
    /// Keeps simplices up to and including `max_year` and merges every
    /// `window` consecutive years.
    ///
    /// # Errors
    /// Returns [`TextProviderError::InvalidWindow`] when `window` is zero.
    pub fn new(max_year: u64, window: usize) -> Result<Self, TextProviderError> {
        let window = NonZeroUsize::new(window).ok_or(TextProviderError::InvalidWindow)?;
        Ok(Self { max_year, window })
    }

    /// Latest year ingested.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max_year(&self) -> u64 { self.max_year }

    /// Years merged per layer.
    #[rustfmt::skip]
    #[must_use]
    pub const fn window(&self) -> NonZeroUsize { self.window }
}

/// The three aligned readers of a simplex dataset.
#[derive(Debug)]
pub struct SimplexReaders<T, C, V> {
    /// One year per simplex.
    pub times: T,
    /// One vertex count per simplex.
    pub counts: C,
    /// Flat vertex stream.
    pub vertices: V,
}

/// Paths of the three files of a simplex dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplexFiles {
    /// One year per simplex.
    pub times: PathBuf,
    /// One vertex count per simplex.
    pub counts: PathBuf,
    /// Flat vertex stream.
    pub vertices: PathBuf,
}

impl SimplexFiles {
    /// Conventional file names inside a dataset directory:
    /// `<prefix>-times.txt`, `<prefix>-nverts.txt` and `<prefix>-simplices.txt`.
    #[must_use]
    pub fn in_directory(directory: &Path, prefix: &str) -> Self {
        Self {
            times: directory.join(format!("{prefix}-times.txt")),
            counts: directory.join(format!("{prefix}-nverts.txt")),
            vertices: directory.join(format!("{prefix}-simplices.txt")),
        }
    }
}

/// Builds year layers from simplices and coalesces them into windows.
///
/// Simplices later than `max_year` are skipped while their vertices are
/// still consumed from the stream. Layers are weighted and undirected, so a
/// pair co-occurring in several simplices accumulates weight.
///
/// # Errors
/// Returns [`TextProviderError::TruncatedSimplex`] when the vertex stream
/// ends inside a simplex, [`TextProviderError::MisalignedSimplexFiles`] when
/// the times and counts sources differ in length, and parse or I/O errors
/// for malformed input.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use plexus_core::{LayerId, NodeId};
/// use plexus_providers_text::{SimplexOptions, SimplexReaders, read_simplices};
///
/// let readers = SimplexReaders {
///     times: Cursor::new("2001\n2002\n2010\n"),
///     counts: Cursor::new("3\n2\n2\n"),
///     vertices: Cursor::new("1\n2\n3\n1\n2\n8\n9\n"),
/// };
/// let graph = read_simplices(readers, &SimplexOptions::new(2005, 2)?)?;
/// assert_eq!(graph.layer_ids(), vec![LayerId::new(2001)]);
/// let layer = graph.layer(LayerId::new(2001)).expect("window exists");
/// assert_eq!(layer.edge_weight(NodeId::new(1), NodeId::new(2)), Some(2.0));
/// # Ok::<(), plexus_providers_text::TextProviderError>(())
/// ```
pub fn read_simplices<T, C, V>(
    readers: SimplexReaders<T, C, V>,
    options: &SimplexOptions,
) -> Result<MultilayerGraph, TextProviderError>
where
    T: BufRead,
    C: BufRead,
    V: BufRead,
{
    ingest(
        Records::new("times", readers.times, COMMENTS),
        Records::new("counts", readers.counts, COMMENTS),
        Records::new("vertices", readers.vertices, COMMENTS),
        options,
    )
}

/// [`read_simplices`] over three files.
///
/// # Errors
/// Returns [`TextProviderError::NotFound`] when any file is missing, plus
/// every [`read_simplices`] error.
pub fn load_simplices(
    files: &SimplexFiles,
    options: &SimplexOptions,
) -> Result<MultilayerGraph, TextProviderError> {
    ingest(
        Records::new(&files.times, open(&files.times)?, COMMENTS),
        Records::new(&files.counts, open(&files.counts)?, COMMENTS),
        Records::new(&files.vertices, open(&files.vertices)?, COMMENTS),
        options,
    )
}

#[instrument(
    name = "text.simplices",
    skip_all,
    fields(max_year = options.max_year, window = options.window.get()),
    err
)]
fn ingest<T, C, V>(
    mut times: Records<T>,
    mut counts: Records<C>,
    mut vertices: Records<V>,
    options: &SimplexOptions,
) -> Result<MultilayerGraph, TextProviderError>
where
    T: BufRead,
    C: BufRead,
    V: BufRead,
{
    let mut years = MultilayerGraph::new(GraphConfig::new());
    let mut simplices = 0_usize;
    let mut skipped = 0_usize;
    let mut members = Vec::new();
    loop {
        let year = match times.next_record()? {
            Some(mut record) => Some(record.field::<u64>("year")?),
            None => None,
        };
        let size = match counts.next_record()? {
            Some(mut record) => Some(record.field::<usize>("vertex count")?),
            None => None,
        };
        let (year, size) = match (year, size) {
            (Some(year), Some(size)) => (year, size),
            (None, None) => break,
            (Some(_), None) => {
                return Err(TextProviderError::MisalignedSimplexFiles {
                    times: simplices + 1 + times.count_remaining()?,
                    counts: simplices,
                });
            }
            (None, Some(_)) => {
                return Err(TextProviderError::MisalignedSimplexFiles {
                    times: simplices,
                    counts: simplices + 1 + counts.count_remaining()?,
                });
            }
        };
        simplices += 1;
        read_members(&mut vertices, simplices, size, &mut members)?;
        if year > options.max_year {
            skipped += 1;
            continue;
        }
        add_clique(&mut years, LayerId::new(year), &members);
    }
    if skipped > 0 {
        warn!(skipped, max_year = options.max_year, "skipped simplices beyond the year bound");
    }
    let windows = years.coalesce_windows(options.window);
    refresh_degrees(&windows);
    info!(
        simplices,
        years = years.layer_count(),
        layers = windows.layer_count(),
        actors = windows.actor_count(),
        "simplices loaded"
    );
    Ok(windows)
}

fn read_members<V: BufRead>(
    vertices: &mut Records<V>,
    simplex: usize,
    size: usize,
    members: &mut Vec<NodeId>,
) -> Result<(), TextProviderError> {
    members.clear();
    while members.len() < size {
        let Some(mut record) = vertices.next_record()? else {
            return Err(TextProviderError::TruncatedSimplex {
                simplex,
                expected: size,
                found: members.len(),
            });
        };
        members.push(NodeId::new(record.field("vertex")?));
    }
    Ok(())
}

fn add_clique(graph: &mut MultilayerGraph, layer: LayerId, members: &[NodeId]) {
    for (position, left) in members.iter().enumerate() {
        graph.add_node(layer, *left);
        for right in members.iter().skip(position + 1) {
            if left != right {
                graph.add_edge(layer, *left, *right, 1.0);
            }
        }
    }
}
