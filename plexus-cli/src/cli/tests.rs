//! Unit tests for argument parsing, command execution and rendering.

use super::commands::derive_source_name;
use super::test_helpers::{create_text_file, run_cli_expecting_error, temp_dir};
use super::{
    AnalyzeCommand, Cli, CliError, Command, ExecutionSummary, ExportArgs, GenerateCommand,
    GraphInput, InfluenceCommand, LayerSource, LayersCommand, PredictCommand, WalkArgs,
    WattsStrogatzArgs, render_summary, run_cli,
};

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use plexus_core::{NodeId, SimilarityKind};
use plexus_providers_text::TextProviderError;
use plexus_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const PATH_GRAPH: &str = "0 1\n1 2\n2 3\n3 4\n";
const STAR_GRAPH: &str = "0 1\n0 2\n0 3\n0 4\n0 5\n";

fn graph_input(path: PathBuf) -> GraphInput {
    GraphInput {
        path,
        directed: false,
        unweighted: false,
    }
}

fn no_walks() -> WalkArgs {
    WalkArgs {
        walks: None,
        steps: 100,
        rng_seed: None,
    }
}

fn ring(export: ExportArgs) -> Cli {
    Cli {
        command: Command::Generate(GenerateCommand::Ws(WattsStrogatzArgs {
            nodes: 10,
            degree: 4,
            rewire: 0.0,
            rng_seed: Some(3),
            export,
        })),
    }
}

fn layers(source: LayerSource) -> LayersCommand {
    LayersCommand {
        cumulative: false,
        summaries: None,
        relevance: None,
        exclusive_relevance: None,
        walk: no_walks(),
        source,
    }
}

fn influence(path: PathBuf, probability: f64) -> InfluenceCommand {
    InfluenceCommand {
        input: graph_input(path),
        max_candidates: 10,
        degree_percentile: 0.9,
        clustering_threshold: 0.3,
        probability,
        rng_seed: 0,
    }
}

#[rstest]
#[case::stem_with_extension("/tmp/karate.txt", "karate")]
#[case::stem_without_extension("/tmp/karate", "karate")]
#[case::missing_stem("", "graph")]
fn derive_source_name_uses_file_stem(#[case] raw_path: &str, #[case] expected: &str) {
    assert_eq!(derive_source_name(Path::new(raw_path)), expected);
}

#[rstest]
fn generate_arguments_fall_back_to_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["plexus", "generate", "ba", "--nodes", "20"])?;
    let Command::Generate(GenerateCommand::Ba(args)) = cli.command else {
        panic!("expected the barabasi-albert command");
    };
    assert_eq!((args.nodes, args.seed_nodes, args.edges_per_node), (20, 3, 2));
    assert_eq!(args.rng_seed, None);
    assert!(args.export.edge_list.is_none());
    Ok(())
}

#[rstest]
fn predict_measures_parse_by_name() -> TestResult {
    let cli = Cli::try_parse_from([
        "plexus",
        "predict",
        "observed.txt",
        "truth.txt",
        "--measure",
        "jaccard",
        "--measure",
        "adamic_adar",
    ])?;
    let Command::Predict(command) = cli.command else {
        panic!("expected the predict command");
    };
    assert_eq!(
        command.measures,
        vec![SimilarityKind::Jaccard, SimilarityKind::AdamicAdar]
    );
    assert_eq!(command.threshold, 0.0);
    Ok(())
}

#[rstest]
fn unknown_measures_are_rejected_by_the_parser() {
    let parsed = Cli::try_parse_from(["plexus", "predict", "a", "b", "--measure", "katz"]);
    assert!(parsed.is_err());
}

#[rstest]
fn layer_sources_parse_as_nested_subcommands() -> TestResult {
    let cli = Cli::try_parse_from([
        "plexus",
        "layers",
        "--cumulative",
        "simplex",
        "data",
        "--prefix",
        "coauth",
        "--max-year",
        "2004",
    ])?;
    let Command::Layers(command) = cli.command else {
        panic!("expected the layers command");
    };
    assert!(command.cumulative);
    let LayerSource::Simplex {
        prefix,
        max_year,
        window,
        ..
    } = command.source
    else {
        panic!("expected the simplex source");
    };
    assert_eq!((prefix.as_str(), max_year, window), ("coauth", 2004, 1));
    Ok(())
}

#[rstest]
fn generate_writes_requested_exports() -> TestResult {
    let dir = temp_dir();
    let edge_list = dir.path().join("ring.csv");
    let adjacency = dir.path().join("ring.adj");
    let summary = run_cli(ring(ExportArgs {
        edge_list: Some(edge_list.clone()),
        adjacency: Some(adjacency.clone()),
    }))?;
    let ExecutionSummary::Graph(report) = summary else {
        panic!("generate reports a graph");
    };
    assert_eq!((report.nodes, report.edges), (10, 20));
    assert!(report.source.starts_with("watts-strogatz"));

    let edges = fs::read_to_string(edge_list)?;
    assert_eq!(edges.lines().next(), Some("source,target"));
    assert_eq!(edges.lines().count(), 1 + 2 * 20);
    assert_eq!(fs::read_to_string(adjacency)?.lines().count(), 10);
    Ok(())
}

#[rstest]
fn generate_rejects_invalid_parameters() {
    let cli = Cli {
        command: Command::Generate(GenerateCommand::Ws(WattsStrogatzArgs {
            nodes: 10,
            degree: 3,
            rewire: 0.1,
            rng_seed: None,
            export: ExportArgs::default(),
        })),
    };
    let err = run_cli_expecting_error(cli, "odd lattice degree must fail");
    assert!(matches!(err, CliError::Generator(_)));
    assert_eq!(err.code(), Some("GENERATOR_INVALID_PARAMETERS"));
}

#[rstest]
fn export_failures_name_the_path() {
    let dir = temp_dir();
    let target = dir.path().join("missing").join("ring.csv");
    let err = run_cli_expecting_error(
        ring(ExportArgs {
            edge_list: Some(target.clone()),
            adjacency: None,
        }),
        "writing into a missing directory must fail",
    );
    assert!(matches!(&err, CliError::Io { path, .. } if path == &target));
    assert_eq!(err.code(), None);
}

#[rstest]
fn analyze_reports_measures_and_occupation() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "triangle.txt", "1 2\n2 3\n3 1\n")?;
    let cli = Cli {
        command: Command::Analyze(AnalyzeCommand {
            input: graph_input(path),
            walk: WalkArgs {
                walks: Some(4),
                steps: 20,
                rng_seed: Some(9),
            },
            export: ExportArgs::default(),
        }),
    };
    let ExecutionSummary::Graph(report) = run_cli(cli)? else {
        panic!("analyze reports a graph");
    };
    assert_eq!(report.source, "triangle");
    assert_eq!((report.nodes, report.edges), (3, 3));
    assert_eq!(report.density, 1.0);
    assert_eq!(report.average_clustering, 1.0);
    assert_eq!(report.most_connected, Some((NodeId::new(1), 2)));
    assert!(report.occupation.is_some_and(f64::is_finite));
    Ok(())
}

#[rstest]
fn analyze_exports_weights_of_weighted_inputs() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "weighted.txt", "1 2 2.5\n2 3\n")?;
    let edge_list = dir.path().join("weighted.csv");
    let cli = Cli {
        command: Command::Analyze(AnalyzeCommand {
            input: graph_input(path),
            walk: no_walks(),
            export: ExportArgs {
                edge_list: Some(edge_list.clone()),
                adjacency: None,
            },
        }),
    };
    run_cli(cli)?;

    let edges = fs::read_to_string(edge_list)?;
    let lines: Vec<&str> = edges.lines().collect();
    assert_eq!(lines.first(), Some(&"source,target,weight"));
    assert_eq!(lines.len(), 1 + 2 * 2);
    assert!(lines.contains(&"1,2,2.5"));
    assert!(lines.contains(&"3,2,1"));
    Ok(())
}

#[rstest]
fn analyze_reports_missing_inputs() {
    let dir = temp_dir();
    let path = dir.path().join("absent.txt");
    let cli = Cli {
        command: Command::Analyze(AnalyzeCommand {
            input: graph_input(path),
            walk: no_walks(),
            export: ExportArgs::default(),
        }),
    };
    let err = run_cli_expecting_error(cli, "missing input must fail");
    assert!(matches!(
        err,
        CliError::Text(TextProviderError::NotFound { .. })
    ));
    assert_eq!(err.code(), Some("TEXT_NOT_FOUND"));
}

#[rstest]
fn analyze_rejects_zero_walks_before_loading() {
    let dir = temp_dir();
    let cli = Cli {
        command: Command::Analyze(AnalyzeCommand {
            input: graph_input(dir.path().join("never-read.txt")),
            walk: WalkArgs {
                walks: Some(0),
                steps: 10,
                rng_seed: None,
            },
            export: ExportArgs::default(),
        }),
    };
    let err = run_cli_expecting_error(cli, "zero walks must fail");
    assert!(matches!(err, CliError::Walk(_)));
}

#[rstest]
fn predict_scores_each_requested_measure() -> TestResult {
    let dir = temp_dir();
    let observed = create_text_file(&dir, "2001.txt", PATH_GRAPH)?;
    let truth = create_text_file(&dir, "2002.txt", &format!("{PATH_GRAPH}0 2\n"))?;
    let predicted = dir.path().join("predicted.csv");
    let cli = Cli {
        command: Command::Predict(PredictCommand {
            observed,
            truth,
            measures: vec![SimilarityKind::CommonNeighbours],
            threshold: 0.5,
            predicted_edge_list: Some(predicted.clone()),
        }),
    };
    let ExecutionSummary::Prediction(report) = run_cli(cli)? else {
        panic!("predict reports scores");
    };
    assert_eq!((report.observed_edges, report.truth_edges), (4, 5));
    assert_eq!(report.candidates, 5);
    let [result] = report.results.as_slice() else {
        panic!("one measure was requested");
    };
    assert_eq!(result.predicted_edges, 3);
    assert_eq!(result.confusion.true_positives, 5);
    assert_eq!(result.confusion.false_positives, 2);
    assert_eq!(fs::read_to_string(predicted)?.lines().count(), 1 + 2 * 7);
    Ok(())
}

#[rstest]
fn predict_defaults_to_every_measure() -> TestResult {
    let dir = temp_dir();
    let observed = create_text_file(&dir, "observed.txt", PATH_GRAPH)?;
    let cli = Cli {
        command: Command::Predict(PredictCommand {
            observed: observed.clone(),
            truth: observed,
            measures: Vec::new(),
            threshold: 0.0,
            predicted_edge_list: None,
        }),
    };
    let ExecutionSummary::Prediction(report) = run_cli(cli)? else {
        panic!("predict reports scores");
    };
    let names: Vec<String> = report.results.iter().map(|r| r.measure.to_string()).collect();
    let expected: Vec<String> = SimilarityKind::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, expected);
    Ok(())
}

#[rstest]
fn layers_write_summaries_and_relevance() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "layers.txt", "1 10 11 1\n1 10 12 1\n2 10 11 1\n")?;
    let summaries = dir.path().join("summaries.csv");
    let relevance = dir.path().join("relevance.csv");
    let mut command = layers(LayerSource::Multilayer { path });
    command.summaries = Some(summaries.clone());
    command.relevance = Some(relevance.clone());

    let cli = Cli {
        command: Command::Layers(command),
    };
    let ExecutionSummary::Layers(report) = run_cli(cli)? else {
        panic!("layers reports statistics");
    };
    assert_eq!(report.actors, 3);
    assert_eq!(report.summaries.len(), 2);
    assert!(report.occupation.is_none());
    assert_eq!(fs::read_to_string(summaries)?.lines().count(), 3);
    assert_eq!(
        fs::read_to_string(relevance)?,
        "actor;1;2\n10;1;0.5\n11;1;1\n12;1;0\n"
    );
    Ok(())
}

#[rstest]
fn temporal_layers_can_be_cumulative() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "stream.txt", "1 2 1 100\n2 3 1 105\n3 4 1 112\n")?;
    let mut command = layers(LayerSource::Temporal { path, step: 5 });
    command.cumulative = true;
    let cli = Cli {
        command: Command::Layers(command),
    };
    let ExecutionSummary::Layers(report) = run_cli(cli)? else {
        panic!("layers reports statistics");
    };
    let edges: Vec<usize> = report.summaries.iter().map(|s| s.edges).collect();
    assert_eq!(edges, vec![1, 2, 3]);
    Ok(())
}

#[rstest]
fn temporal_layers_reject_zero_steps() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "stream.txt", "1 2 1 100\n")?;
    let cli = Cli {
        command: Command::Layers(layers(LayerSource::Temporal { path, step: 0 })),
    };
    let err = run_cli_expecting_error(cli, "zero step must fail");
    assert_eq!(err.code(), Some("TEXT_INVALID_STEP"));
    Ok(())
}

#[rstest]
fn influence_spreads_from_the_hub() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "star.txt", STAR_GRAPH)?;
    let cli = Cli {
        command: Command::Influence(influence(path, 1.0)),
    };
    let summary = run_cli(cli)?;
    let ExecutionSummary::Influence(report) = &summary else {
        panic!("influence reports a cascade");
    };
    assert_eq!(report.candidates, vec![NodeId::new(0)]);
    assert_eq!((report.cascade.activated, report.cascade.rounds), (6, 2));

    let mut rendered = Vec::new();
    render_summary(&summary, &mut rendered)?;
    assert_eq!(
        String::from_utf8(rendered)?,
        "seeds: 0\nactivated: 6\nrounds: 2\nfraction: 1.0000\n"
    );
    Ok(())
}

#[rstest]
#[case::probability_above_one(1.5)]
#[case::negative_probability(-0.1)]
fn influence_rejects_invalid_probabilities(#[case] probability: f64) -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "star.txt", STAR_GRAPH)?;
    let cli = Cli {
        command: Command::Influence(influence(path, probability)),
    };
    let err = run_cli_expecting_error(cli, "probability outside [0, 1] must fail");
    assert_eq!(err.code(), Some("INFLUENCE_INVALID_PARAMETERS"));
    Ok(())
}

#[rstest]
fn run_cli_records_command_and_model() -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || run_cli(ring(ExportArgs::default())))?;

    let run = layer.span("cli.run").ok_or("cli.run span must close")?;
    assert_eq!(run.field("command"), Some("generate"));
    let generate = layer.span("cli.generate").ok_or("cli.generate span must close")?;
    assert_eq!(generate.field("model"), Some("watts-strogatz"));
    Ok(())
}
