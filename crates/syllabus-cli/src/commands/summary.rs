//! Summary command: what a script contains

use clap::Args;
use serde::Serialize;

use super::ScriptArg;
use crate::output::{csv_escape, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub script: ScriptArg,
}

#[derive(Debug, Serialize)]
struct Summary {
    script: String,
    hash: String,
    knowledge_units: usize,
    concepts: usize,
    learning_paths: usize,
    relationships: usize,
    dangling_relationships: usize,
    nodes: usize,
    edges: usize,
    relation_kinds: Vec<String>,
}

impl Summary {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("script", self.script.clone()),
            ("hash", self.hash.clone()),
            ("knowledge_units", self.knowledge_units.to_string()),
            ("concepts", self.concepts.to_string()),
            ("learning_paths", self.learning_paths.to_string()),
            ("relationships", self.relationships.to_string()),
            ("dangling_relationships", self.dangling_relationships.to_string()),
            ("nodes", self.nodes.to_string()),
            ("edges", self.edges.to_string()),
            ("relation_kinds", self.relation_kinds.join(";")),
        ]
    }
}

pub fn run(args: &SummaryArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    let loaded = ctx.load(&args.script.script)?;
    let model = &loaded.model;
    let graph = &loaded.graph;

    let dangling = model
        .relationships
        .iter()
        .filter(|r| !graph.contains(&r.source) || !graph.contains(&r.target))
        .count();

    let summary = Summary {
        script: args.script.script.display().to_string(),
        hash: loaded.hash.to_hex(),
        knowledge_units: model.knowledge_units.len(),
        concepts: model.concepts.len(),
        learning_paths: model.learning_paths.len(),
        relationships: model.relationships.len(),
        dangling_relationships: dangling,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        relation_kinds: model
            .relation_kinds()
            .into_iter()
            .map(|k| k.to_string())
            .collect(),
    };

    match ctx.format(cli) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => {
            println!("key,value");
            for (key, value) in summary.fields() {
                println!("{},{}", key, csv_escape(&value));
            }
        }
        OutputFormat::Table => {
            println!("Script: {}", summary.script);
            println!("  Hash: {}", summary.hash);
            println!("  Knowledge units: {}", summary.knowledge_units);
            println!("  Concepts: {}", summary.concepts);
            println!("  Learning paths: {}", summary.learning_paths);
            println!(
                "  Relationships: {} ({} dangling)",
                summary.relationships, summary.dangling_relationships
            );
            println!("  Graph: {} nodes, {} edges", summary.nodes, summary.edges);
            if !summary.relation_kinds.is_empty() {
                println!("  Relation kinds: {}", summary.relation_kinds.join(", "));
            }
        }
        OutputFormat::GraphMl => {
            anyhow::bail!("GraphML output is only available for graphs; use `select` or `view`")
        }
    }

    Ok(())
}
