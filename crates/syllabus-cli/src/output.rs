//! Output formatting utilities

use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use syllabus_core::{edge_rows, node_rows, CurriculumGraph, EdgeRow, NodeRow};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    #[value(name = "graphml")]
    #[serde(rename = "graphml")]
    GraphMl,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::GraphMl => "graphml",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "graphml" => Ok(Self::GraphMl),
            other => anyhow::bail!("Unknown output format '{}' (table, json, csv, graphml)", other),
        }
    }
}

/// Node and edge rows of one graph, as emitted by `--format json`
#[derive(Serialize)]
struct GraphDocument {
    nodes: Vec<NodeRow>,
    edges: Vec<EdgeRow>,
}

/// Render a whole graph
pub fn render_graph(graph: &CurriculumGraph, format: OutputFormat) -> anyhow::Result<String> {
    let nodes = node_rows(graph);
    let edges = edge_rows(graph);

    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&GraphDocument { nodes, edges })?,
        OutputFormat::Csv => {
            let mut out = String::from("# Nodes\n");
            out.push_str(&nodes_csv(&nodes));
            out.push_str("\n# Edges\n");
            out.push_str(&edges_csv(&edges));
            out
        }
        OutputFormat::GraphMl => graphml(&nodes, &edges),
        OutputFormat::Table => {
            let mut out = format!("Nodes ({})\n", nodes.len());
            out.push_str(&nodes_table(&nodes));
            out.push_str(&format!("\nEdges ({})\n", edges.len()));
            out.push_str(&edges_table(&edges));
            out
        }
    };
    Ok(content)
}

pub fn render_nodes(rows: &[NodeRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => Ok(nodes_csv(rows)),
        OutputFormat::Table => Ok(nodes_table(rows)),
        OutputFormat::GraphMl => anyhow::bail!("GraphML needs a whole graph; use `select` instead"),
    }
}

pub fn render_edges(rows: &[EdgeRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => Ok(edges_csv(rows)),
        OutputFormat::Table => Ok(edges_table(rows)),
        OutputFormat::GraphMl => anyhow::bail!("GraphML needs a whole graph; use `select` instead"),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn node_fields(row: &NodeRow) -> Vec<String> {
    vec![
        row.id.clone(),
        row.kind.to_string(),
        row.label.clone(),
        opt(row.difficulty),
        row.estimated_minutes.to_string(),
        row.description.clone(),
    ]
}

fn edge_fields(row: &EdgeRow) -> Vec<String> {
    vec![
        row.source.clone(),
        row.source_label.clone(),
        opt(row.source_kind),
        row.target.clone(),
        row.target_label.clone(),
        opt(row.target_kind),
        row.relation.to_string(),
        opt(row.strength),
        row.justification.clone().unwrap_or_default(),
        opt(row.position),
    ]
}

const NODE_COLUMNS: [&str; 6] = [
    "id",
    "kind",
    "label",
    "difficulty",
    "estimatedMinutes",
    "description",
];

const EDGE_COLUMNS: [&str; 10] = [
    "source",
    "source_label",
    "source_kind",
    "target",
    "target_label",
    "target_kind",
    "relation",
    "strength",
    "justification",
    "position",
];

fn nodes_csv(rows: &[NodeRow]) -> String {
    csv(&NODE_COLUMNS, rows.iter().map(node_fields))
}

fn edges_csv(rows: &[EdgeRow]) -> String {
    csv(&EDGE_COLUMNS, rows.iter().map(edge_fields))
}

fn csv(columns: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut output = columns.join(",");
    output.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(String::as_str).map(csv_escape).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }
    output
}

/// Escape a string for CSV output with formula injection protection
pub fn csv_escape(s: &str) -> String {
    // Spreadsheets evaluate cells starting with these characters
    let needs_formula_protection = s
        .chars()
        .next()
        .map(|c| matches!(c, '=' | '+' | '-' | '@' | '\t' | '\r'))
        .unwrap_or(false);

    let escaped = if needs_formula_protection {
        format!("'{}", s)
    } else {
        s.to_string()
    };

    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}

fn nodes_table(rows: &[NodeRow]) -> String {
    // description is left out to keep lines short
    table(
        &["ID", "KIND", "LABEL", "DIFFICULTY", "MINUTES"],
        rows.iter().map(|r| {
            let mut fields = node_fields(r);
            fields.truncate(5);
            fields
        }),
    )
}

fn edges_table(rows: &[EdgeRow]) -> String {
    table(
        &["SOURCE", "RELATION", "TARGET", "STRENGTH", "POSITION"],
        rows.iter().map(|r| {
            vec![
                r.source.clone(),
                r.relation.to_string(),
                r.target.clone(),
                opt(r.strength),
                opt(r.position),
            ]
        }),
    )
}

/// Left-aligned columns padded to the widest cell
pub fn table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        let mut line = padded.join("  ").trim_end().to_string();
        line.push('\n');
        line
    };

    let mut out = line(headers.to_vec());
    for row in &rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

fn graphml(nodes: &[NodeRow], edges: &[EdgeRow]) -> String {
    let mut xml = String::new();

    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns
         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
  <key id="d0" for="node" attr.name="kind" attr.type="string"/>
  <key id="d1" for="node" attr.name="label" attr.type="string"/>
  <key id="d2" for="node" attr.name="difficulty" attr.type="string"/>
  <key id="d3" for="node" attr.name="estimatedMinutes" attr.type="int"/>
  <key id="d4" for="edge" attr.name="relation" attr.type="string"/>
  <key id="d5" for="edge" attr.name="strength" attr.type="int"/>
  <key id="d6" for="edge" attr.name="justification" attr.type="string"/>
  <key id="d7" for="edge" attr.name="position" attr.type="int"/>
  <graph id="curriculum" edgedefault="directed">
"#,
    );

    for node in nodes {
        xml.push_str(&format!(
            "    <node id=\"{}\">\n      <data key=\"d0\">{}</data>\n      <data key=\"d1\">{}</data>\n",
            xml_escape(&node.id),
            node.kind,
            xml_escape(&node.label)
        ));
        if let Some(difficulty) = node.difficulty {
            xml.push_str(&format!("      <data key=\"d2\">{}</data>\n", difficulty));
        }
        xml.push_str(&format!(
            "      <data key=\"d3\">{}</data>\n    </node>\n",
            node.estimated_minutes
        ));
    }

    for (i, edge) in edges.iter().enumerate() {
        xml.push_str(&format!(
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">\n      <data key=\"d4\">{}</data>\n",
            i,
            xml_escape(&edge.source),
            xml_escape(&edge.target),
            xml_escape(edge.relation.as_str())
        ));
        if let Some(strength) = edge.strength {
            xml.push_str(&format!("      <data key=\"d5\">{}</data>\n", strength));
        }
        if let Some(justification) = &edge.justification {
            xml.push_str(&format!(
                "      <data key=\"d6\">{}</data>\n",
                xml_escape(justification)
            ));
        }
        if let Some(position) = edge.position {
            xml.push_str(&format!("      <data key=\"d7\">{}</data>\n", position));
        }
        xml.push_str("    </edge>\n");
    }

    xml.push_str("  </graph>\n</graphml>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Print `content`, or write it to `path` readable by the owner only
pub fn emit(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    #[cfg(unix)]
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(content.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
    }

    tracing::info!("Wrote {} bytes to {}", content.len(), path.display());
    println!("Exported to {}", path.display());
    Ok(())
}
