#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Integration tests covering the delimited exporters.
use std::{collections::BTreeMap, io::Cursor};

use plexus_core::{GraphConfig, GraphStore, LayerId, LayerSummary, NodeId};
use plexus_providers_text::{
    read_edge_list, read_multilayer, write_actor_table, write_adjacency_list, write_edge_list,
    write_layer_summaries,
};
use rstest::{fixture, rstest};

#[fixture]
fn triangle_with_tail() -> GraphStore {
    read_edge_list(
        "demo",
        Cursor::new("1 2 2\n2 3\n3 1\n3 4 0.5\n"),
        GraphConfig::new(),
    )
    .expect("fixture must load")
}

fn render(write: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
    let mut out = Vec::new();
    write(&mut out).expect("writing to memory succeeds");
    String::from_utf8(out).expect("output is UTF-8")
}

#[rstest]
fn weighted_edge_list_lists_both_directions(triangle_with_tail: GraphStore) {
    let text = render(|out| write_edge_list(&triangle_with_tail, out));
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("source,target,weight"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2 * triangle_with_tail.edge_count());
    assert_eq!(rows.first(), Some(&"1,2,2"));
    assert!(rows.contains(&"2,1,2"));
    assert!(rows.contains(&"4,3,0.5"));
}

#[rstest]
fn unweighted_edge_list_omits_weights() {
    let graph = read_edge_list("demo", Cursor::new("5 6\n"), GraphConfig::unweighted())
        .expect("edge list must load");
    let text = render(|out| write_edge_list(&graph, out));
    assert_eq!(text, "source,target\n5,6\n6,5\n");
}

#[rstest]
fn adjacency_list_has_one_line_per_node(triangle_with_tail: GraphStore) {
    let text = render(|out| write_adjacency_list(&triangle_with_tail, out));
    assert_eq!(text, "1,2,3\n2,1,3\n3,1,2,4\n4,3\n");
}

#[rstest]
fn isolated_nodes_get_bare_adjacency_lines() {
    let graph = GraphStore::new();
    graph.add_node(NodeId::new(9));
    let text = render(|out| write_adjacency_list(&graph, out));
    assert_eq!(text, "9\n");
}

#[rstest]
fn layer_summaries_use_semicolons_and_none(triangle_with_tail: GraphStore) {
    let empty = GraphStore::new();
    let summaries = vec![
        LayerSummary::of(LayerId::new(1), &triangle_with_tail),
        LayerSummary::of(LayerId::new(2), &empty),
    ];
    let text = render(|out| write_layer_summaries(&summaries, out));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.first().is_some_and(|header| header.starts_with("layer;nodes;edges;density")));
    assert!(lines.get(1).is_some_and(|row| row.starts_with("1;4;4;")));
    assert!(lines.get(1).is_some_and(|row| row.ends_with(";3;3")));
    assert_eq!(lines.get(2), Some(&"2;0;0;None;None;None;None;None;None"));
}

#[rstest]
fn relevance_table_scores_absent_layers_as_zero() {
    let graph = read_multilayer(
        "layers",
        Cursor::new("1 10 11 1\n1 10 12 1\n2 10 11 1\n"),
        GraphConfig::new(),
    )
    .expect("layers must load");
    let table = graph.relevance_table();
    let text = render(|out| write_actor_table(&table, &graph.layer_ids(), out));
    assert_eq!(text, "actor;1;2\n10;1;0.5\n11;1;1\n12;1;0\n");
}

#[rstest]
fn actor_table_writes_non_finite_values_as_none() {
    let mut table = BTreeMap::new();
    table.insert(NodeId::new(3), BTreeMap::from([(LayerId::new(4), f64::NAN)]));
    let text = render(|out| write_actor_table(&table, &[LayerId::new(4)], out));
    assert_eq!(text, "actor;4\n3;None\n");
}
