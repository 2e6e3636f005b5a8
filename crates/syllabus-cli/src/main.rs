//! Syllabus CLI - explore curriculum knowledge graphs built from graph scripts

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, inspect, io, select, summary, view};
use config::Config;
use output::OutputFormat;
use syllabus_core::{GraphCache, LoadedScript};

#[derive(Parser)]
#[command(name = "syllabus")]
#[command(author, version, about = "Explore curriculum knowledge graphs built from graph scripts")]
pub struct Cli {
    /// Output format (defaults to the configured format, normally table)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (command output is still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count the entities and relationships in a script
    Summary(summary::SummaryArgs),
    /// Select a subgraph by kind, seed neighborhood and relation kind
    Select(select::SelectArgs),
    /// Show a preset view of the graph
    View(view::ViewArgs),
    /// Describe one entity and its neighbors
    Inspect(inspect::InspectArgs),
    /// Export the parsed model, node rows or edge rows
    Export(io::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context: configuration and built graphs
pub struct AppContext {
    pub config: Config,
    cache: GraphCache,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: GraphCache::new(),
        }
    }

    /// Read, parse and build a script, reusing an earlier build of the same text
    pub fn load(&mut self, path: &Path) -> anyhow::Result<Arc<LoadedScript>> {
        let loaded = self.cache.load_file(path)?;
        tracing::debug!(
            "Loaded {} ({} nodes, {} edges)",
            path.display(),
            loaded.graph.node_count(),
            loaded.graph.edge_count()
        );
        Ok(loaded)
    }

    /// `--format` if given, else the configured format
    pub fn format(&self, cli: &Cli) -> OutputFormat {
        cli.format.unwrap_or(self.config.format)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting syllabus CLI");

    let mut ctx = AppContext::new(Config::load());

    match &cli.command {
        Commands::Summary(args) => summary::run(args, &cli, &mut ctx)?,
        Commands::Select(args) => select::run(args, &cli, &mut ctx)?,
        Commands::View(args) => view::run(args, &cli, &mut ctx)?,
        Commands::Inspect(args) => inspect::run(args, &cli, &mut ctx)?,
        Commands::Export(args) => io::run_export(args, &cli, &mut ctx)?,
        Commands::Config(args) => commands::config::run(args, &ctx.config)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
