//! End-to-end flows through the public `plexus_core` API.
#![expect(clippy::expect_used, reason = "tests fail loudly on setup errors")]

use std::{num::NonZeroUsize, sync::mpsc};

use plexus_core::{
    BarabasiAlbert, ChannelProgress, CommonNeighbours, GraphConfig, GraphStore, LayerId,
    LinkPrediction, MultilayerGraph, NoProgress, NodeId, ProgressEvent, SimilarityKind,
    WalkParams, WattsStrogatz, measures, predict,
};
use plexus_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing_subscriber::layer::SubscriberExt;

fn node(raw: u64) -> NodeId {
    NodeId::new(raw)
}

#[rstest]
fn barabasi_albert_scenario_attaches_every_new_node() {
    let graph = BarabasiAlbert::new(5, 2, 1)
        .expect("parameters are valid")
        .with_rng_seed(17)
        .generate(&NoProgress);
    assert_eq!(graph.node_count(), 5);
    assert!(graph.has_edge(node(0), node(1)));
    assert!(graph.edge_count() >= 4);
    for raw in 2..5 {
        assert!(graph.neighbour_count(node(raw)) >= 1, "node {raw} is attached");
    }
    assert!(graph.check_symmetry().is_ok());
}

#[rstest]
fn watts_strogatz_ring_lattice_has_twenty_edges() {
    let graph = WattsStrogatz::new(10, 4, 0.0)
        .expect("parameters are valid")
        .generate(&NoProgress);
    assert_eq!(graph.edge_count(), 20);
    for raw in 0..10_u64 {
        for offset in [1, 2, 8, 9] {
            assert!(graph.has_edge(node(raw), node((raw + offset) % 10)));
        }
    }
    let density = measures::density(&graph);
    assert!((density - 40.0 / 90.0).abs() < 1e-12);
}

#[rstest]
fn generator_progress_arrives_over_a_channel() {
    let (sender, receiver) = mpsc::channel();
    let _graph = WattsStrogatz::new(20, 2, 0.5)
        .expect("parameters are valid")
        .generate(&ChannelProgress::new(sender));
    let events: Vec<ProgressEvent> = receiver.try_iter().collect();
    assert!(matches!(events.first(), Some(ProgressEvent::Phase(_))));
    assert!(matches!(events.last(), Some(ProgressEvent::Phase(_))));
    assert!(events.iter().any(|event| matches!(event, ProgressEvent::Percent(value) if *value >= 100.0)));
}

#[rstest]
fn generated_graph_feeds_measures_and_walks() {
    let graph = BarabasiAlbert::new(60, 3, 2)
        .expect("parameters are valid")
        .generate(&NoProgress);
    let mean = measures::average_degree(&graph).expect("generator caches degrees");
    assert!(mean >= 2.0);
    let (hub, degree) = measures::most_connected_node(&graph).expect("graph is not empty");
    assert_eq!(graph.neighbour_count(hub), degree);
    let params = WalkParams::new(30, 10).expect("params are valid");
    let centrality =
        plexus_core::occupation_centrality(&graph, hub, &params).expect("hub exists");
    assert!(centrality > 0.0);
}

#[rstest]
fn prediction_pipeline_scores_against_next_snapshot() {
    let observed = GraphStore::new();
    for raw in 0..5 {
        observed.add_node(node(raw));
    }
    for (left, right) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
        observed.add_undirected_edge(node(left), node(right), 1.0);
    }
    let truth = observed.clone();
    truth.add_undirected_edge(node(0), node(2), 1.0);
    let candidates = observed.nodes();

    let report = LinkPrediction::evaluate(&observed, &truth, 0.5, &CommonNeighbours, &candidates);
    assert_eq!(report.predicted_edges, 3);
    assert_eq!(report.confusion.true_positives, 5);
    assert_eq!(report.confusion.false_positives, 2);
    assert_eq!(report.confusion.false_negatives, 0);
    assert_eq!(report.confusion.total(), 10);

    let self_check = predict::compare(&truth, &truth, &candidates);
    assert_eq!(self_check.false_positives + self_check.false_negatives, 0);
}

#[rstest]
fn every_similarity_kind_drives_prediction() {
    let graph = WattsStrogatz::new(12, 4, 0.0)
        .expect("parameters are valid")
        .generate(&NoProgress);
    for kind in SimilarityKind::ALL {
        let predicted = predict::predict_links(&graph, f64::MAX, kind.measure(), &graph.nodes());
        assert_eq!(predicted.edge_count(), graph.edge_count(), "{kind}");
    }
}

#[rstest]
fn multilayer_views_and_summaries() {
    let mut layers = MultilayerGraph::new(GraphConfig::new());
    for year in 0..4_u64 {
        let store = WattsStrogatz::new(8, 2, 0.0)
            .expect("parameters are valid")
            .generate(&NoProgress);
        store.add_node(node(100 + year));
        layers.insert_layer(LayerId::new(2000 + year), store);
    }
    assert_eq!(layers.actor_count(), 12);

    let windows = layers.coalesce_windows(NonZeroUsize::new(2).expect("non-zero"));
    assert_eq!(windows.layer_ids(), vec![LayerId::new(2000), LayerId::new(2002)]);
    let merged = windows.layer(LayerId::new(2000)).expect("window exists");
    assert_eq!(merged.edge_weight(node(0), node(1)), Some(2.0));

    let summaries = layers.cumulative().layer_summaries();
    let nodes: Vec<usize> = summaries.iter().map(|summary| summary.nodes).collect();
    assert_eq!(nodes, vec![9, 10, 11, 12]);
}

#[rstest]
fn prediction_is_instrumented() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let graph = WattsStrogatz::new(6, 2, 0.0)
        .expect("parameters are valid")
        .generate(&NoProgress);
    tracing::subscriber::with_default(subscriber, || {
        let _predicted = predict::predict_links(&graph, 0.5, &CommonNeighbours, &graph.nodes());
    });
    let span = layer.span("predict.links").expect("prediction span is recorded");
    assert_eq!(span.field("measure"), Some("common-neighbours"));
    assert_eq!(span.field("added"), Some("6"));
    assert!(layer.span("predict.similarity_matrix").is_some());
}
