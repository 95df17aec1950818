//! Delimited text writers for stores, layer summaries and actor tables.
//!
//! Writers emit to any [`Write`] implementation and leave buffering to the
//! caller. Missing or undefined values are written as `None`.

use std::{
    collections::BTreeMap,
    fmt::Display,
    io::{self, Write},
};

use plexus_core::{GraphStore, LayerId, LayerSummary, NodeId};

/// Writes one `source,target[,weight]` row per adjacency entry.
///
/// Undirected edges therefore appear once per direction. The weight column
/// is present only for weighted stores.
///
/// # Errors
/// Propagates write failures.
///
/// # Examples
/// ```
/// use plexus_core::{GraphConfig, GraphStore, NodeId};
/// use plexus_providers_text::write_edge_list;
///
/// let graph = GraphStore::with_config(GraphConfig::unweighted());
/// graph.add_node(NodeId::new(1));
/// graph.add_node(NodeId::new(2));
/// graph.add_undirected_edge(NodeId::new(1), NodeId::new(2), 1.0);
/// let mut out = Vec::new();
/// write_edge_list(&graph, &mut out)?;
/// assert_eq!(String::from_utf8_lossy(&out), "source,target\n1,2\n2,1\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_edge_list<W: Write>(graph: &GraphStore, mut writer: W) -> io::Result<()> {
    let weighted = graph.is_weighted();
    if weighted {
        writeln!(writer, "source,target,weight")?;
    } else {
        writeln!(writer, "source,target")?;
    }
    for (source, target, weight) in graph.edges() {
        if weighted {
            writeln!(writer, "{source},{target},{weight}")?;
        } else {
            writeln!(writer, "{source},{target}")?;
        }
    }
    writer.flush()
}

/// Writes `node,neighbour1,neighbour2,...` for every node in insertion
/// order.
///
/// # Errors
/// Propagates write failures.
pub fn write_adjacency_list<W: Write>(graph: &GraphStore, mut writer: W) -> io::Result<()> {
    for (node, entries) in graph.adjacency() {
        write!(writer, "{node}")?;
        for (neighbour, _) in entries {
            write!(writer, ",{neighbour}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// Writes a `;`-separated table with one row per [`LayerSummary`].
///
/// # Errors
/// Propagates write failures.
pub fn write_layer_summaries<W: Write>(summaries: &[LayerSummary], mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "layer;nodes;edges;density;average_degree;average_weighted_degree;average_clustering;most_connected;most_connected_degree"
    )?;
    for summary in summaries {
        let (hub, hub_degree) = summary
            .most_connected
            .map_or((None, None), |(node, degree)| (Some(node), Some(degree)));
        writeln!(
            writer,
            "{};{};{};{};{};{};{};{};{}",
            summary.layer,
            summary.nodes,
            summary.edges,
            Cell::from_float(summary.density),
            Cell::from_float(summary.average_degree),
            Cell::from_float(summary.average_weighted_degree),
            Cell::from_float(summary.average_clustering),
            Cell(hub),
            Cell(hub_degree),
        )?;
    }
    writer.flush()
}

/// Writes a `;`-separated actor-by-layer table, such as a relevance table.
///
/// Columns follow `layers`; a layer missing from an actor's row is written
/// as `None`.
///
/// # Errors
/// Propagates write failures.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use plexus_core::{LayerId, NodeId};
/// use plexus_providers_text::write_actor_table;
///
/// let mut table = BTreeMap::new();
/// table.insert(NodeId::new(7), BTreeMap::from([(LayerId::new(1), 0.5)]));
/// let mut out = Vec::new();
/// write_actor_table(&table, &[LayerId::new(1), LayerId::new(2)], &mut out)?;
/// assert_eq!(String::from_utf8_lossy(&out), "actor;1;2\n7;0.5;None\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_actor_table<W: Write>(
    table: &BTreeMap<NodeId, BTreeMap<LayerId, f64>>,
    layers: &[LayerId],
    mut writer: W,
) -> io::Result<()> {
    write!(writer, "actor")?;
    for layer in layers {
        write!(writer, ";{layer}")?;
    }
    writeln!(writer)?;
    for (actor, row) in table {
        write!(writer, "{actor}")?;
        for layer in layers {
            let value = row.get(layer).copied().and_then(finite);
            write!(writer, ";{}", Cell(value))?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

struct Cell<T>(Option<T>);

impl Cell<f64> {
    fn from_float(value: f64) -> Self {
        Self(finite(value))
    }
}

impl<T: Display> Display for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
