//! Tests for link prediction and confusion matrices.

use super::*;

use proptest::prelude::*;
use rstest::{fixture, rstest};

use crate::{
    similarity::{CommonNeighbours, Jaccard, SimilarityKind},
    test_utils::{graph_from_edges, id, suite_proptest_config},
};

fn ids(raw: impl IntoIterator<Item = u64>) -> Vec<NodeId> {
    raw.into_iter().map(id).collect()
}

/// Path `0 - 1 - 2 - 3`.
#[fixture]
fn path() -> GraphStore {
    graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)])
}

#[rstest]
fn identical_graphs_match_on_four_candidates(path: GraphStore) {
    let matrix = compare(&path, &path.clone(), &ids(0..4));
    assert_eq!(
        matrix,
        ConfusionMatrix {
            true_positives: 3,
            false_positives: 0,
            false_negatives: 0,
            true_negatives: 3,
        }
    );
    assert_eq!(matrix.accuracy(), Ratio::Defined(1.0));
}

#[rstest]
fn matrix_is_symmetric_and_skips_duplicates(path: GraphStore) {
    let matrix = SimilarityMatrix::compute(&path, &ids([2, 0, 2, 1]), &CommonNeighbours);
    assert_eq!(matrix.len(), 3);
    assert_eq!(matrix.get(id(0), id(2)), Some(1.0));
    assert_eq!(matrix.get(id(2), id(0)), Some(1.0));
    assert_eq!(matrix.get(id(0), id(3)), None);
    assert_eq!(matrix.measure(), "common-neighbours");
}

#[rstest]
fn prediction_adds_pairs_above_threshold_only(path: GraphStore) {
    let predicted = predict_links(&path, 0.5, &CommonNeighbours, &ids(0..4));
    assert!(predicted.has_edge(id(0), id(2)));
    assert!(predicted.has_edge(id(3), id(1)));
    assert!(!predicted.has_edge(id(0), id(3)));
    assert_eq!(predicted_edge_count(&path, &predicted), 2);
    assert!(!path.has_edge(id(0), id(2)), "input must stay untouched");
    assert_eq!(predicted.degree(id(0)), Some(2));
}

#[rstest]
fn existing_edges_keep_their_weight() {
    let graph = GraphStore::new();
    for raw in 0..3 {
        graph.add_node(id(raw));
    }
    graph.add_undirected_edge(id(0), id(1), 4.0);
    graph.add_undirected_edge(id(1), id(2), 1.0);
    graph.add_undirected_edge(id(0), id(2), 1.0);
    let predicted = predict_links(&graph, 0.0, &CommonNeighbours, &ids(0..3));
    assert_eq!(predicted.edge_weight(id(0), id(1)), Some(4.0));
    assert_eq!(predicted_edge_count(&graph, &predicted), 0);
}

#[rstest]
fn candidates_limit_prediction(path: GraphStore) {
    let predicted = predict_links(&path, 0.5, &CommonNeighbours, &ids([0, 2]));
    assert!(predicted.has_edge(id(0), id(2)));
    assert!(!predicted.has_edge(id(1), id(3)));
}

#[rstest]
fn compare_counts_either_direction() {
    let directed = GraphStore::with_config(crate::GraphConfig::new().with_directed(true));
    for raw in 0..2 {
        directed.add_node(id(raw));
    }
    directed.add_edge(id(1), id(0), 1.0);
    let truth = graph_from_edges(2, &[(0, 1)]);
    let matrix = compare(&directed, &truth, &ids(0..2));
    assert_eq!(matrix.true_positives, 1);
    assert_eq!(matrix.total(), 1);
}

#[rstest]
fn empty_candidate_set_leaves_ratios_undefined(path: GraphStore) {
    let matrix = compare(&path, &path, &[]);
    assert_eq!(matrix.total(), 0);
    for ratio in [
        matrix.sensitivity(),
        matrix.recall(),
        matrix.specificity(),
        matrix.precision(),
        matrix.fallout(),
        matrix.accuracy(),
    ] {
        assert_eq!(ratio, Ratio::Undefined);
        assert_eq!(ratio.value(), None);
        assert_eq!(ratio.to_string(), "undefined");
    }
}

#[rstest]
fn ratios_follow_standard_formulas() {
    let matrix = ConfusionMatrix {
        true_positives: 2,
        false_positives: 1,
        false_negatives: 2,
        true_negatives: 5,
    };
    assert_eq!(matrix.sensitivity(), Ratio::Defined(0.5));
    assert_eq!(matrix.recall(), matrix.sensitivity());
    assert_eq!(matrix.specificity(), Ratio::Defined(5.0 / 6.0));
    assert_eq!(matrix.precision(), Ratio::Defined(2.0 / 3.0));
    assert_eq!(matrix.fallout(), Ratio::Defined(1.0 / 6.0));
    assert_eq!(matrix.accuracy(), Ratio::Defined(0.7));
    assert_eq!(Ratio::Defined(0.7).to_string(), "0.7000");
}

#[rstest]
fn evaluation_report_bundles_counts(path: GraphStore) {
    // Ground truth closes the triangle 0-1-2 only.
    let truth = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (0, 2)]);
    let report = LinkPrediction::evaluate(&path, &truth, 0.5, &CommonNeighbours, &ids(0..4));
    assert_eq!(report.measure, "common-neighbours");
    assert_eq!(report.predicted_edges, 2);
    assert_eq!(report.confusion.true_positives, 4);
    assert_eq!(report.confusion.false_positives, 1);
    assert_eq!(report.confusion.true_negatives, 1);
    let names: Vec<&str> = report.ratios().iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        ["sensitivity", "recall", "specificity", "precision", "fallout", "accuracy"]
    );
}

#[rstest]
#[case::common_neighbours(SimilarityKind::CommonNeighbours)]
#[case::jaccard(SimilarityKind::Jaccard)]
fn scoring_a_prediction_matches_evaluation(path: GraphStore, #[case] kind: SimilarityKind) {
    let truth = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (0, 2)]);
    let candidates = ids(0..4);
    let measure = kind.measure();
    let predicted = predict_links(&path, 0.1, measure, &candidates);
    let scored =
        LinkPrediction::score(&path, &predicted, &truth, 0.1, measure.name(), &candidates);
    assert_eq!(
        scored,
        LinkPrediction::evaluate(&path, &truth, 0.1, measure, &candidates)
    );
}

fn arbitrary_graph() -> impl Strategy<Value = GraphStore> {
    proptest::collection::vec((0_u64..10, 0_u64..10), 0..30)
        .prop_map(|edges| graph_from_edges(10, &edges))
}

proptest! {
    #![proptest_config(suite_proptest_config(32))]

    #[test]
    fn self_comparison_has_no_errors(
        graph in arbitrary_graph(),
        candidates in proptest::collection::btree_set(0_u64..10, 0..10),
    ) {
        let candidates = ids(candidates);
        let matrix = compare(&graph, &graph, &candidates);
        let pairs = candidates.len() * candidates.len().saturating_sub(1) / 2;
        prop_assert_eq!(matrix.false_positives, 0);
        prop_assert_eq!(matrix.false_negatives, 0);
        prop_assert_eq!(matrix.true_positives + matrix.true_negatives, pairs as u64);
    }

    #[test]
    fn raising_threshold_never_adds_edges(
        graph in arbitrary_graph(),
        low in 0.0_f64..2.0,
        raise in 0.0_f64..2.0,
        kind_index in 0_usize..SimilarityKind::ALL.len(),
    ) {
        let measure = SimilarityKind::ALL[kind_index].measure();
        let candidates = ids(0..10);
        let matrix = SimilarityMatrix::compute(&graph, &candidates, measure);
        let loose = predict_links_with_matrix(&graph, low, &matrix);
        let strict = predict_links_with_matrix(&graph, low + raise, &matrix);
        prop_assert!(strict.edge_count() <= loose.edge_count());
    }

    #[test]
    fn prediction_is_a_superset(graph in arbitrary_graph(), threshold in 0.0_f64..1.0) {
        let predicted = predict_links(&graph, threshold, &Jaccard, &ids(0..10));
        for (source, target, _) in graph.edges() {
            prop_assert!(predicted.has_edge(source, target));
        }
        prop_assert!(predicted.check_symmetry().is_ok());
    }
}
