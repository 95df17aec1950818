//! Command implementations and argument parsing for the plexus CLI.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use plexus_core::{
    BarabasiAlbert, CandidateCriteria, GeneratorError, GraphConfig, GraphStore, InfluenceError,
    LinkPrediction, MultilayerGraph, SimilarityKind, WalkError, WalkParams, WattsStrogatz,
    average_occupation_centrality, independent_cascade, predict, select_seed_candidates,
};
use plexus_providers_text::{
    SimplexFiles, SimplexOptions, TemporalOptions, TextProviderError, load_edge_list,
    load_multilayer, load_simplices, load_temporal, write_actor_table, write_adjacency_list,
    write_edge_list, write_layer_summaries,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::{
    progress::LoggedProgress,
    summary::{ExecutionSummary, GraphReport, InfluenceReport, LayersReport, PredictionReport},
};

const DEFAULT_STEPS: usize = 100;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "plexus", version, about = "Generate, analyse and compare complex networks.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a random graph.
    #[command(subcommand)]
    Generate(GenerateCommand),
    /// Report structural measures of an edge list.
    Analyze(AnalyzeCommand),
    /// Predict links on one snapshot and score them against a later one.
    Predict(PredictCommand),
    /// Summarise a multilayer network.
    Layers(LayersCommand),
    /// Pick seed candidates and run an independent cascade from them.
    Influence(InfluenceCommand),
}

/// Random graph models.
#[derive(Debug, Subcommand, Clone)]
pub enum GenerateCommand {
    /// Barabási–Albert preferential attachment.
    Ba(BarabasiAlbertArgs),
    /// Watts–Strogatz small world.
    Ws(WattsStrogatzArgs),
}

/// Barabási–Albert parameters.
#[derive(Debug, Args, Clone)]
pub struct BarabasiAlbertArgs {
    /// Final node count.
    #[arg(long)]
    pub nodes: usize,
    /// Size of the complete seed graph.
    #[arg(long, default_value_t = 3)]
    pub seed_nodes: usize,
    /// Edges attached per new node.
    #[arg(long, default_value_t = 2)]
    pub edges_per_node: usize,
    /// Seed for the generator's RNG.
    #[arg(long)]
    pub rng_seed: Option<u64>,
    /// Output files.
    #[command(flatten)]
    pub export: ExportArgs,
}

/// Watts–Strogatz parameters.
#[derive(Debug, Args, Clone)]
pub struct WattsStrogatzArgs {
    /// Node count.
    #[arg(long)]
    pub nodes: usize,
    /// Even ring-lattice degree.
    #[arg(long, default_value_t = 4)]
    pub degree: usize,
    /// Probability of rewiring each lattice edge.
    #[arg(long, default_value_t = 0.1)]
    pub rewire: f64,
    /// Seed for the generator's RNG.
    #[arg(long)]
    pub rng_seed: Option<u64>,
    /// Output files.
    #[command(flatten)]
    pub export: ExportArgs,
}

/// Optional exports of a single graph.
#[derive(Debug, Args, Clone, Default)]
pub struct ExportArgs {
    /// Write `source,target[,weight]` rows to this file.
    #[arg(long, value_name = "PATH")]
    pub edge_list: Option<PathBuf>,
    /// Write `node,neighbour,...` lines to this file.
    #[arg(long, value_name = "PATH")]
    pub adjacency: Option<PathBuf>,
}

/// An edge list on disk and how to interpret it.
#[derive(Debug, Args, Clone)]
pub struct GraphInput {
    /// Edge list with `from to [weight]` lines.
    pub path: PathBuf,
    /// Keep edge orientation.
    #[arg(long)]
    pub directed: bool,
    /// Ignore weights and collapse repeated edges.
    #[arg(long)]
    pub unweighted: bool,
}

impl GraphInput {
    fn config(&self) -> GraphConfig {
        GraphConfig::new()
            .with_directed(self.directed)
            .with_weighted(!self.unweighted)
    }
}

/// Random-walk options.
#[derive(Debug, Args, Clone)]
pub struct WalkArgs {
    /// Walks per node; occupation centrality is skipped when absent.
    #[arg(long)]
    pub walks: Option<usize>,
    /// Steps per walk.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,
    /// Seed for the walk RNGs.
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

impl WalkArgs {
    fn params(&self) -> Result<Option<WalkParams>, WalkError> {
        let Some(walks) = self.walks else {
            return Ok(None);
        };
        let params = WalkParams::new(self.steps, walks)?;
        Ok(Some(match self.rng_seed {
            Some(seed) => params.with_rng_seed(seed),
            None => params,
        }))
    }
}

/// Options accepted by `analyze`.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeCommand {
    /// Graph to measure.
    #[command(flatten)]
    pub input: GraphInput,
    /// Occupation-centrality sampling.
    #[command(flatten)]
    pub walk: WalkArgs,
    /// Output files.
    #[command(flatten)]
    pub export: ExportArgs,
}

/// Options accepted by `predict`.
#[derive(Debug, Args, Clone)]
pub struct PredictCommand {
    /// Observed snapshot, `from to [weight]` lines.
    pub observed: PathBuf,
    /// Later snapshot used as ground truth.
    pub truth: PathBuf,
    /// Similarity measures to evaluate; every measure when omitted.
    #[arg(long = "measure", value_name = "NAME")]
    pub measures: Vec<SimilarityKind>,
    /// Score a pair must exceed to become a predicted edge.
    #[arg(long, default_value_t = 0.0)]
    pub threshold: f64,
    /// Write the graph predicted by the first measure to this edge list.
    #[arg(long, value_name = "PATH")]
    pub predicted_edge_list: Option<PathBuf>,
}

/// Multilayer input formats.
#[derive(Debug, Subcommand, Clone)]
pub enum LayerSource {
    /// `layer from to weight` lines.
    Multilayer {
        /// Layered edge file.
        path: PathBuf,
    },
    /// `from to weight timestamp` lines bucketed by time.
    Temporal {
        /// Timestamped edge file.
        path: PathBuf,
        /// Timestamp units per layer.
        #[arg(long)]
        step: u64,
    },
    /// Times, vertex counts and vertices of timestamped simplices.
    Simplex {
        /// Directory holding `<prefix>-times.txt`, `<prefix>-nverts.txt` and
        /// `<prefix>-simplices.txt`.
        directory: PathBuf,
        /// Dataset file prefix.
        #[arg(long)]
        prefix: String,
        /// Latest year to ingest.
        #[arg(long)]
        max_year: u64,
        /// Years merged into one layer.
        #[arg(long, default_value_t = 1)]
        window: usize,
    },
}

/// Options accepted by `layers`.
#[derive(Debug, Args, Clone)]
pub struct LayersCommand {
    /// Make every layer include all earlier layers.
    #[arg(long)]
    pub cumulative: bool,
    /// Write the `;`-separated layer summary table to this file.
    #[arg(long, value_name = "PATH")]
    pub summaries: Option<PathBuf>,
    /// Write the actor relevance table to this file.
    #[arg(long, value_name = "PATH")]
    pub relevance: Option<PathBuf>,
    /// Write the actor exclusive-relevance table to this file.
    #[arg(long, value_name = "PATH")]
    pub exclusive_relevance: Option<PathBuf>,
    /// Multilayer occupation-centrality sampling.
    #[command(flatten)]
    pub walk: WalkArgs,
    /// Input format and location.
    #[command(subcommand)]
    pub source: LayerSource,
}

/// Options accepted by `influence`.
#[derive(Debug, Args, Clone)]
pub struct InfluenceCommand {
    /// Graph to spread over.
    #[command(flatten)]
    pub input: GraphInput,
    /// Upper bound on seed nodes.
    #[arg(long, default_value_t = 10)]
    pub max_candidates: usize,
    /// Degree percentile, as a fraction, a seed must reach.
    #[arg(long, default_value_t = 0.9)]
    pub degree_percentile: f64,
    /// Largest clustering coefficient a seed may have.
    #[arg(long, default_value_t = 0.3)]
    pub clustering_threshold: f64,
    /// Activation probability per edge.
    #[arg(long, default_value_t = 0.1)]
    pub probability: f64,
    /// Seed for the cascade RNG.
    #[arg(long, default_value_t = 0)]
    pub rng_seed: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing an output file failed.
    #[error("failed to write `{}`: {source}", path.display())]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Loading an input failed.
    #[error(transparent)]
    Text(#[from] TextProviderError),
    /// Generator parameters were rejected.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    /// Walk parameters were rejected.
    #[error(transparent)]
    Walk(#[from] WalkError),
    /// Influence parameters were rejected.
    #[error(transparent)]
    Influence(#[from] InfluenceError),
}

impl CliError {
    /// Stable code of the underlying library error, if any.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => None,
            Self::Text(err) => Some(err.code().as_str()),
            Self::Generator(err) => Some(err.code().as_str()),
            Self::Walk(err) => Some(err.code().as_str()),
            Self::Influence(err) => Some(err.code().as_str()),
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, validation or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use plexus_cli::cli::{
/// #     Cli, Command, ExecutionSummary, ExportArgs, GenerateCommand, WattsStrogatzArgs, run_cli,
/// # };
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand::Ws(WattsStrogatzArgs {
///         nodes: 10,
///         degree: 4,
///         rewire: 0.0,
///         rng_seed: None,
///         export: ExportArgs::default(),
///     })),
/// };
/// let ExecutionSummary::Graph(report) = run_cli(cli)? else {
///     unreachable!("generate reports a graph");
/// };
/// assert_eq!(report.edges, 20);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", "generate");
            run_generate(command)
        }
        Command::Analyze(command) => {
            span.record("command", "analyze");
            run_analyze(command)
        }
        Command::Predict(command) => {
            span.record("command", "predict");
            run_predict(command)
        }
        Command::Layers(command) => {
            span.record("command", "layers");
            run_layers(command)
        }
        Command::Influence(command) => {
            span.record("command", "influence");
            run_influence(command)
        }
    }
}

#[instrument(name = "cli.generate", err, skip(command), fields(model = field::Empty))]
pub(super) fn run_generate(command: GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let progress = LoggedProgress::new(10.0);
    let (source, graph, export) = match command {
        GenerateCommand::Ba(args) => {
            Span::current().record("model", "barabasi-albert");
            let mut model = BarabasiAlbert::new(args.nodes, args.seed_nodes, args.edges_per_node)?;
            if let Some(seed) = args.rng_seed {
                model = model.with_rng_seed(seed);
            }
            let source = format!(
                "barabasi-albert(n={}, m={}, d={})",
                args.nodes, args.seed_nodes, args.edges_per_node
            );
            (source, model.generate(&progress), args.export)
        }
        GenerateCommand::Ws(args) => {
            Span::current().record("model", "watts-strogatz");
            let mut model = WattsStrogatz::new(args.nodes, args.degree, args.rewire)?;
            if let Some(seed) = args.rng_seed {
                model = model.with_rng_seed(seed);
            }
            let source = format!(
                "watts-strogatz(n={}, k={}, p={})",
                args.nodes, args.degree, args.rewire
            );
            (source, model.generate(&progress), args.export)
        }
    };
    export_graph(&graph, &export)?;
    let report = GraphReport::measure(source, &graph);
    info!(nodes = report.nodes, edges = report.edges, "graph generated");
    Ok(ExecutionSummary::Graph(report))
}

#[instrument(name = "cli.analyze", err, skip(command), fields(path = %command.input.path.display()))]
pub(super) fn run_analyze(command: AnalyzeCommand) -> Result<ExecutionSummary, CliError> {
    let params = command.walk.params()?;
    let graph = load_edge_list(&command.input.path, command.input.config())?;
    export_graph(&graph, &command.export)?;
    let mut report = GraphReport::measure(derive_source_name(&command.input.path), &graph);
    report.occupation = params.map(|params| average_occupation_centrality(&graph, &params));
    Ok(ExecutionSummary::Graph(report))
}

#[instrument(
    name = "cli.predict",
    err,
    skip(command),
    fields(threshold = command.threshold, measures = field::Empty)
)]
pub(super) fn run_predict(command: PredictCommand) -> Result<ExecutionSummary, CliError> {
    let config = GraphConfig::unweighted();
    let observed = load_edge_list(&command.observed, config)?;
    let truth = load_edge_list(&command.truth, config)?;
    let kinds = if command.measures.is_empty() {
        SimilarityKind::ALL.to_vec()
    } else {
        command.measures
    };
    Span::current().record("measures", kinds.len());
    let candidates = observed.nodes();
    let mut exported = None;
    let mut results = Vec::with_capacity(kinds.len());
    for kind in &kinds {
        let measure = kind.measure();
        let predicted = predict::predict_links(&observed, command.threshold, measure, &candidates);
        results.push(LinkPrediction::score(
            &observed,
            &predicted,
            &truth,
            command.threshold,
            measure.name(),
            &candidates,
        ));
        if exported.is_none() {
            exported = Some(predicted);
        }
    }
    if let (Some(path), Some(predicted)) = (&command.predicted_edge_list, &exported) {
        write_file(path, |writer| write_edge_list(predicted, writer))?;
    }
    Ok(ExecutionSummary::Prediction(PredictionReport {
        observed_edges: observed.edge_count(),
        truth_edges: truth.edge_count(),
        candidates: candidates.len(),
        results,
    }))
}

#[instrument(name = "cli.layers", err, skip(command), fields(cumulative = command.cumulative))]
pub(super) fn run_layers(command: LayersCommand) -> Result<ExecutionSummary, CliError> {
    let params = command.walk.params()?;
    let graph = load_layers(&command.source, command.cumulative)?;
    let layer_ids = graph.layer_ids();
    let summaries = graph.layer_summaries();
    if let Some(path) = &command.summaries {
        write_file(path, |writer| write_layer_summaries(&summaries, writer))?;
    }
    if let Some(path) = &command.relevance {
        let table = graph.relevance_table();
        write_file(path, |writer| write_actor_table(&table, &layer_ids, writer))?;
    }
    if let Some(path) = &command.exclusive_relevance {
        let table = graph.exclusive_relevance_table();
        write_file(path, |writer| write_actor_table(&table, &layer_ids, writer))?;
    }
    let occupation = params.map(|params| graph.average_occupation_centrality(&layer_ids, &params));
    info!(layers = layer_ids.len(), actors = graph.actor_count(), "layers summarised");
    Ok(ExecutionSummary::Layers(LayersReport {
        actors: graph.actor_count(),
        averages: graph.actor_averages(&layer_ids),
        summaries,
        occupation,
    }))
}

fn load_layers(source: &LayerSource, cumulative: bool) -> Result<MultilayerGraph, CliError> {
    let graph = match source {
        LayerSource::Multilayer { path } => load_multilayer(path, GraphConfig::new())?,
        LayerSource::Temporal { path, step } => {
            let options = TemporalOptions::new(*step)?.with_cumulative(cumulative);
            return Ok(load_temporal(path, &options)?);
        }
        LayerSource::Simplex {
            directory,
            prefix,
            max_year,
            window,
        } => {
            let files = SimplexFiles::in_directory(directory, prefix);
            load_simplices(&files, &SimplexOptions::new(*max_year, *window)?)?
        }
    };
    Ok(if cumulative { graph.cumulative() } else { graph })
}

#[instrument(name = "cli.influence", err, skip(command), fields(path = %command.input.path.display()))]
pub(super) fn run_influence(command: InfluenceCommand) -> Result<ExecutionSummary, CliError> {
    let criteria = CandidateCriteria::new(command.max_candidates)?
        .with_degree_percentile(command.degree_percentile)?
        .with_clustering_threshold(command.clustering_threshold);
    let graph = load_edge_list(&command.input.path, command.input.config())?;
    let candidates = select_seed_candidates(&graph, &criteria);
    let cascade = independent_cascade(&graph, &candidates, command.probability, command.rng_seed)?;
    Ok(ExecutionSummary::Influence(InfluenceReport {
        candidates,
        cascade,
    }))
}

fn export_graph(graph: &GraphStore, export: &ExportArgs) -> Result<(), CliError> {
    if let Some(path) = &export.edge_list {
        write_file(path, |writer| write_edge_list(graph, writer))?;
    }
    if let Some(path) = &export.adjacency {
        write_file(path, |writer| write_adjacency_list(graph, writer))?;
    }
    Ok(())
}

#[instrument(name = "cli.write_file", err, skip(write), fields(path = %path.display()))]
pub(super) fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), CliError> {
    let wrap = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(wrap)?);
    write(&mut writer).map_err(wrap)?;
    writer.flush().map_err(wrap)
}

pub(super) fn derive_source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "graph".to_owned(), ToOwned::to_owned)
}
