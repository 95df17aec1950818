//! Command results and their plain-text rendering.

use std::io::{self, Write};

use plexus_core::{
    ActorAverages, Cascade, GraphStore, LayerSummary, LinkPrediction, NodeId, measures,
};

/// Outcome of one CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// A generated or loaded graph and its measures.
    Graph(GraphReport),
    /// Link-prediction scores per measure.
    Prediction(PredictionReport),
    /// Multilayer statistics.
    Layers(LayersReport),
    /// Seed selection and cascade outcome.
    Influence(InfluenceReport),
}

/// Whole-graph measures.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphReport {
    /// Generator description or input file stem.
    pub source: String,
    /// Node count.
    pub nodes: usize,
    /// Edge count.
    pub edges: usize,
    /// Edge density.
    pub density: f64,
    /// Mean neighbour count.
    pub average_degree: f64,
    /// Mean summed edge weight.
    pub average_weighted_degree: f64,
    /// Mean clustering coefficient.
    pub average_clustering: f64,
    /// Hub and its neighbour count.
    pub most_connected: Option<(NodeId, usize)>,
    /// Mean occupation centrality, when walks were requested.
    pub occupation: Option<f64>,
}

impl GraphReport {
    /// Measures `graph`, refreshing its degree cache first.
    #[must_use]
    pub fn measure(source: impl Into<String>, graph: &GraphStore) -> Self {
        graph.recompute_degrees();
        Self {
            source: source.into(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            density: measures::density(graph),
            average_degree: measures::average_degree(graph).unwrap_or(f64::NAN),
            average_weighted_degree: measures::average_weighted_degree(graph),
            average_clustering: measures::average_clustering_coefficient(graph),
            most_connected: measures::most_connected_node(graph),
            occupation: None,
        }
    }
}

/// Prediction results on one observed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    /// Edges in the observed graph.
    pub observed_edges: usize,
    /// Edges in the ground-truth graph.
    pub truth_edges: usize,
    /// Nodes whose pairs were scored.
    pub candidates: usize,
    /// One result per measure, in request order.
    pub results: Vec<LinkPrediction>,
}

/// Per-layer and actor-level statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct LayersReport {
    /// Distinct actors.
    pub actors: usize,
    /// One row per layer in ascending order.
    pub summaries: Vec<LayerSummary>,
    /// Actor measures averaged over all layers.
    pub averages: ActorAverages,
    /// Mean multilayer occupation centrality, when walks were requested.
    pub occupation: Option<f64>,
}

/// Selected seeds and the cascade they started.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceReport {
    /// Seed candidates in selection order.
    pub candidates: Vec<NodeId>,
    /// Cascade outcome.
    pub cascade: Cascade,
}

/// Renders `summary` to `writer` as `key: value` lines.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use plexus_cli::cli::{ExecutionSummary, GraphReport, render_summary};
/// # use plexus_core::{GraphStore, NodeId};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let graph = GraphStore::new();
/// graph.add_node(NodeId::new(0));
/// graph.add_node(NodeId::new(1));
/// graph.add_undirected_edge(NodeId::new(0), NodeId::new(1), 1.0);
/// let summary = ExecutionSummary::Graph(GraphReport::measure("pair", &graph));
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("source: pair\nnodes: 2\nedges: 1\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Graph(report) => render_graph(report, &mut writer),
        ExecutionSummary::Prediction(report) => render_prediction(report, &mut writer),
        ExecutionSummary::Layers(report) => render_layers(report, &mut writer),
        ExecutionSummary::Influence(report) => render_influence(report, &mut writer),
    }
}

fn render_graph(report: &GraphReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "source: {}", report.source)?;
    writeln!(writer, "nodes: {}", report.nodes)?;
    writeln!(writer, "edges: {}", report.edges)?;
    writeln!(writer, "density: {}", Value(report.density))?;
    writeln!(writer, "average degree: {}", Value(report.average_degree))?;
    writeln!(
        writer,
        "average weighted degree: {}",
        Value(report.average_weighted_degree)
    )?;
    writeln!(writer, "average clustering: {}", Value(report.average_clustering))?;
    match report.most_connected {
        Some((node, degree)) => writeln!(writer, "most connected: {node} ({degree} neighbours)")?,
        None => writeln!(writer, "most connected: none")?,
    }
    if let Some(occupation) = report.occupation {
        writeln!(writer, "average occupation centrality: {}", Value(occupation))?;
    }
    Ok(())
}

fn render_prediction(report: &PredictionReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "observed edges: {}", report.observed_edges)?;
    writeln!(writer, "truth edges: {}", report.truth_edges)?;
    writeln!(writer, "candidates: {}", report.candidates)?;
    for result in &report.results {
        let matrix = &result.confusion;
        writeln!(
            writer,
            "{} (threshold {}): predicted {} | tp {} fp {} fn {} tn {}",
            result.measure,
            result.threshold,
            result.predicted_edges,
            matrix.true_positives,
            matrix.false_positives,
            matrix.false_negatives,
            matrix.true_negatives,
        )?;
        for (name, ratio) in result.ratios() {
            writeln!(writer, "  {name}: {ratio}")?;
        }
    }
    Ok(())
}

fn render_layers(report: &LayersReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "actors: {}", report.actors)?;
    writeln!(writer, "layers: {}", report.summaries.len())?;
    for summary in &report.summaries {
        writeln!(
            writer,
            "layer {}: {} nodes, {} edges, density {}, clustering {}",
            summary.layer,
            summary.nodes,
            summary.edges,
            Value(summary.density),
            Value(summary.average_clustering),
        )?;
    }
    let averages = &report.averages;
    for (name, value) in [
        ("degree centrality", averages.degree_centrality),
        ("degree deviation", averages.degree_deviation),
        ("neighbourhood centrality", averages.neighbourhood_centrality),
        ("connective redundancy", averages.connective_redundancy),
        (
            "exclusive neighbourhood centrality",
            averages.exclusive_neighbourhood_centrality,
        ),
    ] {
        writeln!(writer, "average {name}: {}", Value(value))?;
    }
    if let Some(occupation) = report.occupation {
        writeln!(writer, "average occupation centrality: {}", Value(occupation))?;
    }
    Ok(())
}

fn render_influence(report: &InfluenceReport, writer: &mut impl Write) -> io::Result<()> {
    let seeds: Vec<String> = report.candidates.iter().map(ToString::to_string).collect();
    writeln!(writer, "seeds: {}", seeds.join(","))?;
    writeln!(writer, "activated: {}", report.cascade.activated)?;
    writeln!(writer, "rounds: {}", report.cascade.rounds)?;
    writeln!(writer, "fraction: {}", Value(report.cascade.fraction))?;
    Ok(())
}

/// Four-decimal rendering with `undefined` for non-finite values.
struct Value(f64);

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_finite() {
            write!(f, "{:.4}", self.0)
        } else {
            f.write_str("undefined")
        }
    }
}
