//! Export command

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use syllabus_core::{edge_rows, node_rows};

use super::ScriptArg;
use crate::output::{emit, render_edges, render_nodes, OutputFormat};
use crate::{AppContext, Cli};

/// What to export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    /// The parsed model (entity tables and raw relationships) as JSON
    #[default]
    Model,
    /// One row per graph node
    Nodes,
    /// One row per graph edge
    Edges,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub script: ScriptArg,

    /// What to export
    #[arg(short, long, value_enum, default_value_t = ExportTarget::Model)]
    pub what: ExportTarget,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run_export(args: &ExportArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    let loaded = ctx.load(&args.script.script)?;
    let format = ctx.format(cli);
    tracing::info!("Exporting {:?} as {}", args.what, format.as_str());

    let content = match args.what {
        ExportTarget::Model => match format {
            OutputFormat::Json | OutputFormat::Table => {
                serde_json::to_string_pretty(&loaded.model)?
            }
            other => anyhow::bail!("The model exports as JSON only, not {}", other.as_str()),
        },
        ExportTarget::Nodes => {
            let rows = node_rows(&loaded.graph);
            tracing::debug!("Exporting {} node rows", rows.len());
            render_nodes(&rows, format)?
        }
        ExportTarget::Edges => {
            let rows = edge_rows(&loaded.graph);
            tracing::debug!("Exporting {} edge rows", rows.len());
            render_edges(&rows, format)?
        }
    };

    emit(&content, args.output.as_deref())
}
