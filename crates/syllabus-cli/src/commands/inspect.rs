//! Inspect command: one entity and its typed neighbors

use clap::Args;

use syllabus_core::{describe, EntityView, NeighborRef, PositionedRef, RelatedUnit};

use super::{check_entity_id, ScriptArg};
use crate::output::OutputFormat;
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub script: ScriptArg,

    /// Entity id
    pub id: String,
}

pub fn run(args: &InspectArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    check_entity_id(&args.id)?;
    let loaded = ctx.load(&args.script.script)?;
    let view = describe(&loaded.graph, &args.id)?;

    match ctx.format(cli) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => print_view(&view),
        other => anyhow::bail!("inspect supports table and json output, not {}", other.as_str()),
    }
    Ok(())
}

fn print_view(view: &EntityView) {
    match view {
        EntityView::KnowledgeUnit {
            unit,
            containing_concepts,
            outgoing,
            incoming,
        } => {
            println!("Knowledge unit: {} ({})", unit.title, unit.id);
            println!("  Difficulty: {}", unit.difficulty);
            println!("  Estimated minutes: {}", unit.estimated_minutes);
            println!("  Source: {} {}", unit.source_lesson, unit.source_title);
            println!("  Description: {}", unit.description);
            print_neighbors("Part of concepts", containing_concepts);
            print_related("Outgoing", outgoing);
            print_related("Incoming", incoming);
        }
        EntityView::Concept {
            concept,
            including_paths,
            prerequisites,
            dependents,
            units,
        } => {
            println!("Concept: {} ({})", concept.name, concept.id);
            println!("  Estimated minutes: {}", concept.estimated_minutes);
            println!("  Description: {}", concept.description);
            print_neighbors("In learning paths", including_paths);
            print_neighbors("Prerequisites", prerequisites);
            print_neighbors("Prerequisite for", dependents);
            print_positioned("Knowledge units", units);
        }
        EntityView::LearningPath {
            path,
            key_competencies,
            concepts,
        } => {
            println!("Learning path: {} ({})", path.name, path.id);
            println!("  Target audience: {}", path.target_audience);
            println!("  Estimated minutes: {}", path.estimated_minutes);
            println!("  Description: {}", path.description);
            if !key_competencies.is_empty() {
                println!("  Key competencies:");
                for competency in key_competencies {
                    println!("    - {}", competency);
                }
            }
            print_positioned("Concepts", concepts);
        }
    }
}

fn print_neighbors(heading: &str, neighbors: &[NeighborRef]) {
    if neighbors.is_empty() {
        return;
    }
    println!("  {}:", heading);
    for n in neighbors {
        println!("    - {} ({})", n.label, n.id);
    }
}

fn print_related(heading: &str, related: &[RelatedUnit]) {
    if related.is_empty() {
        return;
    }
    println!("  {}:", heading);
    for r in related {
        match r.strength {
            Some(strength) => println!("    - [{} {}] {} ({})", r.relation, strength, r.label, r.id),
            None => println!("    - [{}] {} ({})", r.relation, r.label, r.id),
        }
    }
}

fn print_positioned(heading: &str, members: &[PositionedRef]) {
    if members.is_empty() {
        return;
    }
    println!("  {}:", heading);
    for m in members {
        println!("    {}. {} ({})", m.position, m.label, m.id);
    }
}
