//! Command-line orchestration for plexus.
//!
//! Commands generate random graphs, measure edge lists, evaluate link
//! prediction between two snapshots, summarise multilayer datasets and run
//! influence cascades. Each command returns an [`ExecutionSummary`] that
//! [`render_summary`] prints as `key: value` lines.

mod commands;
mod progress;
mod summary;

pub use commands::{
    AnalyzeCommand, BarabasiAlbertArgs, Cli, CliError, Command, ExportArgs, GenerateCommand,
    GraphInput, InfluenceCommand, LayerSource, LayersCommand, PredictCommand, WalkArgs,
    WattsStrogatzArgs, run_cli,
};
pub use summary::{
    ExecutionSummary, GraphReport, InfluenceReport, LayersReport, PredictionReport,
    render_summary,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
