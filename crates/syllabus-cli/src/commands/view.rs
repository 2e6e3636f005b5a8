//! View command: preset subgraphs

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use syllabus_core::limits::validate_hop_radius;
use syllabus_core::views::{
    concept_view, default_relationship_selection, node_view, overview, path_view,
    relationships_view,
};
use syllabus_core::RelationKind;

use super::check_entity_id;
use crate::output::{emit, render_graph};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct ViewArgs {
    #[command(subcommand)]
    pub command: ViewCommands,

    /// Output file (stdout if omitted)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ViewCommands {
    /// Learning paths and concepts
    Overview {
        /// Path to the graph script
        script: PathBuf,
        /// Also include every knowledge unit
        #[arg(long)]
        units: bool,
    },
    /// One learning path with its concepts and their neighbors
    Path {
        /// Path to the graph script
        script: PathBuf,
        /// Learning path id (PATH-<digits>)
        id: String,
    },
    /// One concept with its neighbors
    Concept {
        /// Path to the graph script
        script: PathBuf,
        /// Concept id (CONCEPT-<digits>)
        id: String,
    },
    /// Knowledge units and the relationships between them
    Relationships {
        /// Path to the graph script
        script: PathBuf,
        /// Relation kind to show; repeatable (defaults to the config, then LEADS_TO/PRECEDES)
        #[arg(short, long = "relation")]
        relations: Vec<String>,
    },
    /// Any entity and its neighborhood
    Node {
        /// Path to the graph script
        script: PathBuf,
        /// Entity id
        id: String,
        /// Neighborhood radius (defaults to the config value)
        #[arg(long)]
        hops: Option<u32>,
    },
}

pub fn run(args: &ViewArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    let subgraph = match &args.command {
        ViewCommands::Overview { script, units } => {
            let loaded = ctx.load(script)?;
            overview(&loaded.graph, *units || ctx.config.overview_units)
        }
        ViewCommands::Path { script, id } => {
            check_entity_id(id)?;
            let loaded = ctx.load(script)?;
            path_view(&loaded.graph, id)?
        }
        ViewCommands::Concept { script, id } => {
            check_entity_id(id)?;
            let loaded = ctx.load(script)?;
            concept_view(&loaded.graph, id)?
        }
        ViewCommands::Relationships { script, relations } => {
            let loaded = ctx.load(script)?;
            let mut selected: BTreeSet<RelationKind> = relations
                .iter()
                .map(|r| RelationKind::from(r.to_uppercase()))
                .collect();
            if selected.is_empty() {
                selected.extend(ctx.config.relation_kinds());
            }
            if selected.is_empty() {
                selected.extend(default_relationship_selection(
                    &loaded.model.relation_kinds(),
                ));
            }
            tracing::info!(
                "Showing relations: {}",
                selected
                    .iter()
                    .map(RelationKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            relationships_view(&loaded.graph, &selected)
        }
        ViewCommands::Node { script, id, hops } => {
            check_entity_id(id)?;
            let hops = hops.unwrap_or(ctx.config.hops);
            validate_hop_radius(hops)?;
            let loaded = ctx.load(script)?;
            node_view(&loaded.graph, id, hops)?
        }
    };

    let content = render_graph(&subgraph, ctx.format(cli))?;
    emit(&content, args.output.as_deref())
}
