//! Neighbourhood similarity measures used for link prediction.
//!
//! Every measure is a stateless strategy passed explicitly to the prediction
//! routines. Degrees are live neighbour counts, so scores never depend on the
//! degree cache. Zero denominators score 0. Common neighbours are visited in
//! ascending id order, which keeps floating-point sums identical for `(a, b)`
//! and `(b, a)`.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::{node::NodeId, store::GraphStore};

/// Pairwise similarity strategy.
pub trait Similarity: Sync {
    /// Scores the pair `(left, right)` in `graph`.
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64;

    /// Stable name of the measure.
    fn name(&self) -> &'static str;
}

/// Number of shared neighbours.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommonNeighbours;

/// Shared neighbours divided by the size of the neighbourhood union.
#[derive(Clone, Copy, Debug, Default)]
pub struct Jaccard;

/// Sum of `1 / ln(degree)` over shared neighbours.
///
/// Shared neighbours of degree below two contribute nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdamicAdar;

/// Product of the two degrees.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreferentialAttachment;

/// Sum of `1 / degree` over shared neighbours.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResourceAllocation;

/// Shared neighbours divided by `sqrt(degree_a * degree_b)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cosine;

/// `2 * shared / (degree_a + degree_b)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sorensen;

impl Similarity for CommonNeighbours {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        common_neighbours(graph, left, right).len() as f64
    }

    fn name(&self) -> &'static str {
        "common-neighbours"
    }
}

impl Similarity for Jaccard {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        let left_neighbours = graph.neighbours(left);
        let right_neighbours = graph.neighbours(right);
        let shared = intersect(&left_neighbours, &right_neighbours).len();
        let union = left_neighbours.len() + right_neighbours.len() - shared;
        ratio(shared as f64, union as f64)
    }

    fn name(&self) -> &'static str {
        "jaccard"
    }
}

impl Similarity for AdamicAdar {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        common_neighbours(graph, left, right)
            .into_iter()
            .map(|shared| graph.neighbour_count(shared))
            .filter(|degree| *degree >= 2)
            .map(|degree| (degree as f64).ln().recip())
            .sum()
    }

    fn name(&self) -> &'static str {
        "adamic-adar"
    }
}

impl Similarity for PreferentialAttachment {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        (graph.neighbour_count(left) * graph.neighbour_count(right)) as f64
    }

    fn name(&self) -> &'static str {
        "preferential-attachment"
    }
}

impl Similarity for ResourceAllocation {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        common_neighbours(graph, left, right)
            .into_iter()
            .map(|shared| graph.neighbour_count(shared))
            .filter(|degree| *degree > 0)
            .map(|degree| (degree as f64).recip())
            .sum()
    }

    fn name(&self) -> &'static str {
        "resource-allocation"
    }
}

impl Similarity for Cosine {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        let left_neighbours = graph.neighbours(left);
        let right_neighbours = graph.neighbours(right);
        let shared = intersect(&left_neighbours, &right_neighbours).len() as f64;
        let scale = ((left_neighbours.len() * right_neighbours.len()) as f64).sqrt();
        ratio(shared, scale)
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

impl Similarity for Sorensen {
    fn score(&self, graph: &GraphStore, left: NodeId, right: NodeId) -> f64 {
        let left_neighbours = graph.neighbours(left);
        let right_neighbours = graph.neighbours(right);
        let shared = intersect(&left_neighbours, &right_neighbours).len() as f64;
        let total = (left_neighbours.len() + right_neighbours.len()) as f64;
        ratio(2.0 * shared, total)
    }

    fn name(&self) -> &'static str {
        "sorensen"
    }
}

/// Selector for the built-in measures, usable from configuration and CLI
/// flags.
///
/// # Examples
/// ```
/// use plexus_core::SimilarityKind;
///
/// let kind: SimilarityKind = "adamic-adar".parse()?;
/// assert_eq!(kind.measure().name(), "adamic-adar");
/// # Ok::<(), plexus_core::UnknownSimilarity>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimilarityKind {
    /// [`CommonNeighbours`].
    CommonNeighbours,
    /// [`Jaccard`].
    Jaccard,
    /// [`AdamicAdar`].
    AdamicAdar,
    /// [`PreferentialAttachment`].
    PreferentialAttachment,
    /// [`ResourceAllocation`].
    ResourceAllocation,
    /// [`Cosine`].
    Cosine,
    /// [`Sorensen`].
    Sorensen,
}

impl SimilarityKind {
    /// Every built-in measure.
    pub const ALL: [Self; 7] = [
        Self::CommonNeighbours,
        Self::Jaccard,
        Self::AdamicAdar,
        Self::PreferentialAttachment,
        Self::ResourceAllocation,
        Self::Cosine,
        Self::Sorensen,
    ];

    /// Strategy object for this measure.
    #[must_use]
    pub fn measure(self) -> &'static dyn Similarity {
        match self {
            Self::CommonNeighbours => &CommonNeighbours,
            Self::Jaccard => &Jaccard,
            Self::AdamicAdar => &AdamicAdar,
            Self::PreferentialAttachment => &PreferentialAttachment,
            Self::ResourceAllocation => &ResourceAllocation,
            Self::Cosine => &Cosine,
            Self::Sorensen => &Sorensen,
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.measure().name())
    }
}

/// Error returned when parsing an unknown [`SimilarityKind`] name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown similarity measure `{0}`")]
pub struct UnknownSimilarity(pub String);

impl FromStr for SimilarityKind {
    type Err = UnknownSimilarity;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.measure().name() == normalised)
            .ok_or_else(|| UnknownSimilarity(raw.to_owned()))
    }
}

/// Shared neighbours of `left` and `right` in ascending id order.
#[must_use]
pub fn common_neighbours(graph: &GraphStore, left: NodeId, right: NodeId) -> Vec<NodeId> {
    intersect(&graph.neighbours(left), &graph.neighbours(right))
}

/// Merges two ascending id lists into their intersection.
fn intersect(left: &[NodeId], right: &[NodeId]) -> Vec<NodeId> {
    let mut shared = Vec::new();
    let (mut left_pos, mut right_pos) = (0, 0);
    while let (Some(a), Some(b)) = (left.get(left_pos), right.get(right_pos)) {
        match a.cmp(b) {
            Ordering::Less => left_pos += 1,
            Ordering::Greater => right_pos += 1,
            Ordering::Equal => {
                shared.push(*a);
                left_pos += 1;
                right_pos += 1;
            }
        }
    }
    shared
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
