//! Threshold link prediction and its evaluation against ground truth.
//!
//! A [`SimilarityMatrix`] scores every unordered candidate pair once; the
//! predictor copies the observed graph and adds an edge for each pair that
//! scores strictly above the threshold. [`compare`] then classifies every
//! candidate pair into a [`ConfusionMatrix`].

use std::{collections::BTreeMap, fmt};

use rayon::prelude::*;
use tracing::instrument;

use crate::{node::NodeId, similarity::Similarity, store::GraphStore};

/// Scores for every unordered pair of distinct candidates.
///
/// Only `(a, b)` with `a < b` is stored; [`SimilarityMatrix::get`] reads the
/// pair in either order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimilarityMatrix {
    measure: &'static str,
    scores: BTreeMap<(NodeId, NodeId), f64>,
}

impl SimilarityMatrix {
    /// Scores every candidate pair with `measure`, one row per candidate in
    /// parallel.
    ///
    /// Duplicate candidates are scored once.
    #[instrument(
        name = "predict.similarity_matrix",
        skip(graph, candidates, measure),
        fields(measure = measure.name(), candidates = candidates.len())
    )]
    #[must_use]
    pub fn compute(graph: &GraphStore, candidates: &[NodeId], measure: &dyn Similarity) -> Self {
        let rows = distinct(candidates);
        let scores = rows
            .par_iter()
            .enumerate()
            .flat_map_iter(|(row, left)| {
                rows.get(row + 1..).unwrap_or_default().iter().map(move |right| {
                    let key = ordered(*left, *right);
                    (key, measure.score(graph, key.0, key.1))
                })
            })
            .collect();
        Self {
            measure: measure.name(),
            scores,
        }
    }

    /// Score of the pair in either order, `None` when it was not a candidate
    /// pair.
    #[must_use]
    pub fn get(&self, left: NodeId, right: NodeId) -> Option<f64> {
        self.scores.get(&ordered(left, right)).copied()
    }

    /// Name of the measure that produced the scores.
    #[rustfmt::skip]
    #[must_use]
    pub fn measure(&self) -> &'static str { self.measure }

    /// Number of scored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` when no pair was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scored pairs `(a, b, score)` with `a < b`, in ascending pair order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.scores
            .iter()
            .map(|((left, right), score)| (*left, *right, *score))
    }
}

/// Copies `graph` and adds an edge for every candidate pair scoring strictly
/// above `threshold`.
///
/// The input is never mutated. Pairs that are already connected are left
/// alone, so the copy is a superset of the input.
///
/// # Examples
/// ```
/// use plexus_core::{GraphStore, Jaccard, NodeId, predict};
///
/// let graph = GraphStore::new();
/// let ids: Vec<NodeId> = (0..3).map(NodeId::new).collect();
/// for node in &ids {
///     graph.add_node(*node);
/// }
/// graph.add_undirected_edge(ids[0], ids[2], 1.0);
/// graph.add_undirected_edge(ids[1], ids[2], 1.0);
/// let predicted = predict::predict_links(&graph, 0.5, &Jaccard, &ids);
/// assert!(predicted.has_edge(ids[0], ids[1]));
/// assert!(!graph.has_edge(ids[0], ids[1]));
/// ```
#[must_use]
pub fn predict_links(
    graph: &GraphStore,
    threshold: f64,
    measure: &dyn Similarity,
    candidates: &[NodeId],
) -> GraphStore {
    let matrix = SimilarityMatrix::compute(graph, candidates, measure);
    predict_links_with_matrix(graph, threshold, &matrix)
}

/// [`predict_links`] over a precomputed matrix.
#[instrument(
    name = "predict.links",
    skip(graph, matrix),
    fields(measure = matrix.measure(), pairs = matrix.len(), added = tracing::field::Empty)
)]
#[must_use]
pub fn predict_links_with_matrix(
    graph: &GraphStore,
    threshold: f64,
    matrix: &SimilarityMatrix,
) -> GraphStore {
    let predicted = graph.clone();
    let mut added = 0;
    for (left, right, score) in matrix.iter() {
        if score > threshold
            && !predicted.has_edge(left, right)
            && predicted.add_undirected_edge(left, right, 1.0).is_inserted()
        {
            added += 1;
        }
    }
    if added > 0 {
        predicted.recompute_degrees();
    }
    tracing::Span::current().record("added", added);
    record_predicted_edges(matrix.measure(), added);
    predicted
}

/// Number of edges `predicted` holds beyond `observed`.
#[must_use]
pub fn predicted_edge_count(observed: &GraphStore, predicted: &GraphStore) -> usize {
    predicted.edge_count().saturating_sub(observed.edge_count())
}

/// Classifies every unordered candidate pair by edge presence in `predicted`
/// and `truth`.
///
/// An edge counts as present when stored in either direction. Duplicate
/// candidates are considered once.
#[instrument(
    name = "predict.compare",
    skip(predicted, truth, candidates),
    fields(candidates = candidates.len())
)]
#[must_use]
pub fn compare(predicted: &GraphStore, truth: &GraphStore, candidates: &[NodeId]) -> ConfusionMatrix {
    let rows = distinct(candidates);
    rows.par_iter()
        .enumerate()
        .fold(ConfusionMatrix::default, |mut matrix, (row, left)| {
            for right in rows.get(row + 1..).unwrap_or_default() {
                matrix.record(
                    connected(predicted, *left, *right),
                    connected(truth, *left, *right),
                );
            }
            matrix
        })
        .reduce(ConfusionMatrix::default, ConfusionMatrix::merge)
}

/// Ratio that may be undefined because its denominator is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    /// The denominator was positive.
    Defined(f64),
    /// The denominator was zero.
    Undefined,
}

impl Ratio {
    fn of(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Self::Undefined
        } else {
            Self::Defined(numerator as f64 / denominator as f64)
        }
    }

    /// The value, if defined.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(value) => write!(f, "{value:.4}"),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// Pair counts comparing a predicted graph with ground truth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Pairs connected in both graphs.
    pub true_positives: u64,
    /// Pairs connected only in the prediction.
    pub false_positives: u64,
    /// Pairs connected only in the ground truth.
    pub false_negatives: u64,
    /// Pairs connected in neither graph.
    pub true_negatives: u64,
}

impl ConfusionMatrix {
    fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_positives += 1,
            (false, true) => self.false_negatives += 1,
            (false, false) => self.true_negatives += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
            true_negatives: self.true_negatives + other.true_negatives,
        }
    }

    /// Total number of classified pairs.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    /// `TP / (TP + FN)`.
    #[must_use]
    pub fn sensitivity(&self) -> Ratio {
        Ratio::of(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Same as [`ConfusionMatrix::sensitivity`].
    #[must_use]
    pub fn recall(&self) -> Ratio {
        self.sensitivity()
    }

    /// `TN / (TN + FP)`.
    #[must_use]
    pub fn specificity(&self) -> Ratio {
        Ratio::of(self.true_negatives, self.true_negatives + self.false_positives)
    }

    /// `TP / (TP + FP)`.
    #[must_use]
    pub fn precision(&self) -> Ratio {
        Ratio::of(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `FP / (FP + TN)`.
    #[must_use]
    pub fn fallout(&self) -> Ratio {
        Ratio::of(self.false_positives, self.false_positives + self.true_negatives)
    }

    /// `(TP + TN) / total`.
    #[must_use]
    pub fn accuracy(&self) -> Ratio {
        Ratio::of(self.true_positives + self.true_negatives, self.total())
    }
}

/// Outcome of predicting links on an observed graph and scoring the result
/// against ground truth.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkPrediction {
    /// Measure used for scoring.
    pub measure: &'static str,
    /// Threshold a score had to exceed.
    pub threshold: f64,
    /// Edges added beyond the observed graph.
    pub predicted_edges: usize,
    /// Pair classification against ground truth.
    pub confusion: ConfusionMatrix,
}

impl LinkPrediction {
    /// Predicts links on `observed` and compares the result with `truth`.
    ///
    /// `candidates` drive both the prediction and the comparison.
    #[instrument(
        name = "predict.evaluate",
        skip(observed, truth, measure, candidates),
        fields(measure = measure.name(), candidates = candidates.len())
    )]
    #[must_use]
    pub fn evaluate(
        observed: &GraphStore,
        truth: &GraphStore,
        threshold: f64,
        measure: &dyn Similarity,
        candidates: &[NodeId],
    ) -> Self {
        let predicted = predict_links(observed, threshold, measure, candidates);
        Self::score(observed, &predicted, truth, threshold, measure.name(), candidates)
    }

    /// Scores an already predicted graph against `truth`.
    ///
    /// `predicted` must be the output of [`predict_links`] on `observed`
    /// with the same `threshold`, measure and `candidates`.
    #[must_use]
    pub fn score(
        observed: &GraphStore,
        predicted: &GraphStore,
        truth: &GraphStore,
        threshold: f64,
        measure: &'static str,
        candidates: &[NodeId],
    ) -> Self {
        Self {
            measure,
            threshold,
            predicted_edges: predicted_edge_count(observed, predicted),
            confusion: compare(predicted, truth, candidates),
        }
    }

    /// The six derived ratios in report order: sensitivity, recall,
    /// specificity, precision, fallout, accuracy.
    #[must_use]
    pub fn ratios(&self) -> [(&'static str, Ratio); 6] {
        let matrix = &self.confusion;
        [
            ("sensitivity", matrix.sensitivity()),
            ("recall", matrix.recall()),
            ("specificity", matrix.specificity()),
            ("precision", matrix.precision()),
            ("fallout", matrix.fallout()),
            ("accuracy", matrix.accuracy()),
        ]
    }
}

fn connected(graph: &GraphStore, left: NodeId, right: NodeId) -> bool {
    graph.has_edge(left, right) || graph.has_edge(right, left)
}

fn ordered(left: NodeId, right: NodeId) -> (NodeId, NodeId) {
    if left <= right { (left, right) } else { (right, left) }
}

fn distinct(candidates: &[NodeId]) -> Vec<NodeId> {
    let mut rows = candidates.to_vec();
    rows.sort_unstable();
    rows.dedup();
    rows
}

#[cfg(feature = "metrics")]
fn record_predicted_edges(measure: &'static str, edges: usize) {
    metrics::counter!("plexus_predicted_edges_total", "measure" => measure)
        .increment(edges as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_predicted_edges(_measure: &'static str, _edges: usize) {}

#[cfg(test)]
mod tests;
