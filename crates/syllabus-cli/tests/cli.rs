//! CLI integration tests for syllabus
//!
//! Runs the binary end-to-end with assert_cmd against a script written to a
//! temporary directory. Every test points SYLLABUS_CONFIG at its own file.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCRIPT: &str = r#"
CREATE (n:KnowledgeNode {id: "N1", title: "Customer needs", description: "Identify what customers need", difficulty: "Beginner", estimatedMinutes: 15, source_lesson: "L01", source_title: "Why service design"});
CREATE (n:KnowledgeNode {id: "N2", title: "Personas", description: "Archetypes from research", difficulty: "Intermediate", estimatedMinutes: 20, source_lesson: "L01", source_title: "Why service design"});
CREATE (n:KnowledgeNode {id: "N3", title: "Journey stages", description: "Break an experience into stages", difficulty: "Advanced", estimatedMinutes: 25, source_lesson: "L02", source_title: "Mapping journeys"});
CREATE (c:Concept {id: "CONCEPT-1", name: "User research", description: "Understanding people", estimatedMinutes: 35});
CREATE (c:Concept {id: "CONCEPT-2", name: "Journey mapping", description: "Experiences over time", estimatedMinutes: 25});
CREATE (p:LearningPath {id: "PATH-1", name: "Foundations", description: "From research to journeys", targetAudience: "New designers", keyCompetencies: "Empathy;Mapping", estimatedMinutes: 60});
MATCH (a:KnowledgeNode {id: "N1"}), (b:KnowledgeNode {id: "N2"}) CREATE (a)-[:LEADS_TO {strength: 4, justification: "Personas summarize needs"}]->(b);
MATCH (a:KnowledgeNode {id: "N2"}), (b:KnowledgeNode {id: "N3"}) CREATE (a)-[:SUPPORTS {strength: 2, justification: "Journeys follow a persona"}]->(b);
MATCH (a:KnowledgeNode {id: "N3"}), (b:KnowledgeNode {id: "N7"}) CREATE (a)-[:ENABLES {strength: 1, justification: "Never created"}]->(b);
MATCH (c:Concept {id: "CONCEPT-1"}), (n:KnowledgeNode {id: "N2"}) CREATE (c)-[:CONTAINS {sequence: 1}]->(n);
MATCH (c:Concept {id: "CONCEPT-1"}), (n:KnowledgeNode {id: "N1"}) CREATE (c)-[:CONTAINS {sequence: 0}]->(n);
MATCH (c:Concept {id: "CONCEPT-2"}), (n:KnowledgeNode {id: "N3"}) CREATE (c)-[:CONTAINS {sequence: 0}]->(n);
MATCH (p:LearningPath {id: "PATH-1"}), (c:Concept {id: "CONCEPT-2"}) CREATE (p)-[:INCLUDES {sequence: 1}]->(c);
MATCH (p:LearningPath {id: "PATH-1"}), (c:Concept {id: "CONCEPT-1"}) CREATE (p)-[:INCLUDES {sequence: 0}]->(c);
MATCH (a:Concept {id: "CONCEPT-1"}), (b:Concept {id: "CONCEPT-2"}) CREATE (a)-[:PREREQUISITE_FOR]->(b);
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("curriculum.cypher"), SCRIPT).unwrap();
        Self { dir }
    }

    fn script(&self) -> String {
        self.dir.path().join("curriculum.cypher").display().to_string()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("syllabus").unwrap();
        cmd.env("SYLLABUS_CONFIG", self.path("config.toml"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.cmd().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_help() {
    Workspace::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_summary_table() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["summary", &ws.script()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Knowledge units: 3"))
        .stdout(predicate::str::contains("Relationships: 4 (1 dangling)"))
        .stdout(predicate::str::contains("Graph: 6 nodes, 8 edges"));
}

#[test]
fn test_quiet_limits_logs_not_output() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Only log errors"));
    ws.cmd()
        .args(["-q", "summary", &ws.script()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Knowledge units: 3"));
}

#[test]
fn test_summary_json() {
    let ws = Workspace::new();
    let summary = ws.json(&["summary", &ws.script(), "--format", "json"]);

    assert_eq!(summary["concepts"], 2);
    assert_eq!(summary["learning_paths"], 1);
    assert_eq!(summary["hash"].as_str().map(str::len), Some(64));
    assert_eq!(
        summary["relation_kinds"],
        serde_json::json!(["ENABLES", "LEADS_TO", "PREREQUISITE_FOR", "SUPPORTS"])
    );
}

#[test]
fn test_missing_script_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["summary", &ws.path("absent.cypher").display().to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script"));
}

#[test]
fn test_select_units_json() {
    let ws = Workspace::new();
    let graph = ws.json(&["select", &ws.script(), "--kind", "unit", "-f", "json"]);

    assert_eq!(graph["nodes"].as_array().map(Vec::len), Some(3));
    assert_eq!(graph["edges"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_select_seed_neighborhood() {
    let ws = Workspace::new();
    let graph = ws.json(&[
        "select",
        &ws.script(),
        "--seed",
        "N1",
        "--hops",
        "1",
        "--format",
        "json",
    ]);

    let mut ids: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["CONCEPT-1", "N1", "N2"]);
}

#[test]
fn test_select_rejects_large_radius() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["select", &ws.script(), "--seed", "N1", "--hops", "51"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Hop radius"));
}

#[test]
fn test_select_rejects_malformed_seed() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["select", &ws.script(), "--seed", "lesson-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed entity id"));
}

#[test]
fn test_view_path_graphml() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["view", "path", &ws.script(), "PATH-1", "--format", "graphml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<graphml"))
        .stdout(predicate::str::contains("<node id=\"PATH-1\">"))
        .stdout(predicate::str::contains("<node id=\"N3\">"));
}

#[test]
fn test_view_relationships_defaults_to_leads_to() {
    let ws = Workspace::new();
    let graph = ws.json(&["view", "relationships", &ws.script(), "-f", "json"]);

    let edges = graph["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["relation"], "LEADS_TO");
}

#[test]
fn test_view_unknown_concept_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["view", "concept", &ws.script(), "CONCEPT-9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entity not found: CONCEPT-9"));
}

#[test]
fn test_inspect_concept_table() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["inspect", &ws.script(), "CONCEPT-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Concept: User research (CONCEPT-1)"))
        .stdout(predicate::str::contains("1. Customer needs (N1)"))
        .stdout(predicate::str::contains("2. Personas (N2)"))
        .stdout(predicate::str::contains("Prerequisite for:"));
}

#[test]
fn test_inspect_unit_json() {
    let ws = Workspace::new();
    let view = ws.json(&["inspect", &ws.script(), "N2", "--format", "json"]);

    assert_eq!(view["kind"], "KnowledgeUnit");
    assert_eq!(view["incoming"][0]["id"], "N1");
    assert_eq!(view["outgoing"][0]["relation"], "SUPPORTS");
}

#[test]
fn test_inspect_unknown_id_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["inspect", &ws.script(), "N404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entity not found: N404"));
}

#[test]
fn test_export_nodes_csv_to_file() {
    let ws = Workspace::new();
    let out = ws.path("nodes.csv");

    ws.cmd()
        .args(["export", &ws.script(), "--what", "nodes", "--format", "csv", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("id,kind,label,difficulty,estimatedMinutes,description\n"));
    assert!(content.contains("N2,KnowledgeUnit,Personas,Intermediate,20,Archetypes from research"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_export_model_keeps_dangling_relationship() {
    let ws = Workspace::new();
    let model = ws.json(&["export", &ws.script()]);

    let targets: Vec<&str> = model["relationships"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["target"].as_str())
        .collect();
    assert!(targets.contains(&"N7"));
}

#[test]
fn test_config_set_and_get() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "set", "format", "json"])
        .assert()
        .success();
    ws.cmd()
        .args(["config", "get", "format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("json"));

    // the configured format now applies without --format
    let summary = ws.json(&["summary", &ws.script()]);
    assert_eq!(summary["nodes"], 6);
}

#[test]
fn test_config_unknown_key_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let ws = Workspace::new();

    ws.cmd().args(["config", "init"]).assert().success();
    assert!(ws.path("config.toml").exists());
    ws.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    ws.cmd().args(["config", "init", "--force"]).assert().success();
}

#[test]
fn test_completions() {
    Workspace::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("syllabus"));
}
