//! Select command: arbitrary subgraph queries

use std::path::PathBuf;

use clap::Args;

use syllabus_core::limits::validate_hop_radius;
use syllabus_core::{select, EntityKind, RelationKind, SubgraphQuery};

use super::{check_entity_id, ScriptArg};
use crate::output::{emit, render_graph};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub script: ScriptArg,

    /// Include every entity of this kind (unit, concept, path); repeatable
    #[arg(short, long = "kind")]
    pub kinds: Vec<EntityKind>,

    /// Start the neighborhood from this entity id; repeatable
    #[arg(short, long = "seed")]
    pub seeds: Vec<String>,

    /// Keep only edges of this relation kind; repeatable
    #[arg(short, long = "relation")]
    pub relations: Vec<String>,

    /// Expansion rounds around the seeds, following edges both ways
    #[arg(long, default_value_t = 0)]
    pub hops: u32,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SelectArgs {
    fn query(&self) -> anyhow::Result<SubgraphQuery> {
        validate_hop_radius(self.hops)?;
        for seed in &self.seeds {
            check_entity_id(seed)?;
        }

        Ok(SubgraphQuery::new()
            .with_kinds(self.kinds.iter().copied())
            .with_seeds(self.seeds.iter().cloned())
            .with_relations(
                self.relations
                    .iter()
                    .map(|r| RelationKind::from(r.to_uppercase())),
            )
            .with_hops(self.hops))
    }
}

pub fn run(args: &SelectArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    let query = args.query()?;
    let loaded = ctx.load(&args.script.script)?;

    tracing::info!(
        "Selecting with {} kinds, {} seeds, {} relations, {} hops",
        query.kinds.len(),
        query.seeds.len(),
        query.relations.len(),
        query.hop_radius
    );
    let subgraph = select(&loaded.graph, &query);

    let content = render_graph(&subgraph, ctx.format(cli))?;
    emit(&content, args.output.as_deref())
}
