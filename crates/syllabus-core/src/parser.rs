//! Script parser
//!
//! Recognizes the fixed set of creation and linking statements used by
//! curriculum scripts. Anything else in the text is skipped: parsing never
//! fails, a malformed statement simply contributes nothing to the model.
//!
//! Recognized shapes:
//!
//! ```text
//! CREATE (n:KnowledgeNode {id: "N1", title: "...", description: "...",
//!     difficulty: "...", estimatedMinutes: 10, source_lesson: "...", source_title: "..."});
//! CREATE (c:Concept {id: "CONCEPT-1", name: "...", description: "...", estimatedMinutes: 30});
//! CREATE (p:LearningPath {id: "PATH-1", name: "...", description: "...",
//!     targetAudience: "...", keyCompetencies: "a;b", estimatedMinutes: 90});
//! MATCH (a:KnowledgeNode {id: "N1"}), (b:KnowledgeNode {id: "N2"})
//!     CREATE (a)-[:LEADS_TO {strength: 3, justification: "..."}]->(b);
//! MATCH (c:Concept {id: "CONCEPT-1"}), (n:KnowledgeNode {id: "N1"})
//!     CREATE (c)-[:CONTAINS {sequence: 0}]->(n);
//! MATCH (p:LearningPath {id: "PATH-1"}), (c:Concept {id: "CONCEPT-1"})
//!     CREATE (p)-[:INCLUDES {sequence: 0}]->(c);
//! MATCH (a:Concept {id: "CONCEPT-1"}), (b:Concept {id: "CONCEPT-2"})
//!     CREATE (a)-[:PREREQUISITE_FOR]->(b);
//! ```

use crate::entity::{Concept, Difficulty, EntityKind, KnowledgeUnit, LearningPath};
use crate::limits::validate_entity_id;
use crate::model::ParsedModel;
use crate::relation::Relationship;

/// A statement recovered from a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateUnit(KnowledgeUnit),
    CreateConcept(Concept),
    CreatePath(LearningPath),
    LinkUnits(Relationship),
    LinkContains {
        concept: String,
        unit: String,
        sequence: u32,
    },
    LinkIncludes {
        path: String,
        concept: String,
        sequence: u32,
    },
    LinkPrerequisite {
        prerequisite: String,
        concept: String,
    },
}

/// Parse a script into entity and relationship collections
pub fn parse(script: &str) -> ParsedModel {
    let mut model = ParsedModel::default();
    let mut scanner = StatementScanner::new(script);

    for statement in scanner.by_ref() {
        model.apply(statement);
    }

    if scanner.skipped() > 0 {
        tracing::debug!(
            "Skipped {} unrecognized statement candidates",
            scanner.skipped()
        );
    }

    tracing::info!(
        "Extracted {} knowledge units, {} concepts, {} learning paths, and {} relationships",
        model.knowledge_units.len(),
        model.concepts.len(),
        model.learning_paths.len(),
        model.relationships.len()
    );

    model
}

/// Iterator over the recognized statements of a script, in text order
pub struct StatementScanner<'a> {
    src: &'a str,
    pos: usize,
    skipped: usize,
    create: KeywordSearch,
    matches: KeywordSearch,
}

impl<'a> StatementScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            skipped: 0,
            create: KeywordSearch::new("CREATE"),
            matches: KeywordSearch::new("MATCH"),
        }
    }

    /// Offset of the next `CREATE` or `MATCH` at or after the current position
    fn next_keyword(&mut self) -> Option<usize> {
        let create = self.create.next_from(self.src, self.pos);
        let matches = self.matches.next_from(self.src, self.pos);
        match (create, matches) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Number of `CREATE`/`MATCH` occurrences that did not form a recognized statement
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for StatementScanner<'_> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        loop {
            let start = self.next_keyword()?;
            let mut cursor = Cursor {
                src: self.src,
                pos: start,
            };

            match cursor.statement() {
                Some(statement) => {
                    self.pos = cursor.pos;
                    return Some(statement);
                }
                None => {
                    self.skipped += 1;
                    // Keywords are ASCII, so this stays on a char boundary
                    self.pos = start + 1;
                }
            }
        }
    }
}

/// Remembers the last hit for one keyword so the text is searched only once
struct KeywordSearch {
    keyword: &'static str,
    found: Option<usize>,
    exhausted: bool,
}

impl KeywordSearch {
    fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            found: None,
            exhausted: false,
        }
    }

    fn next_from(&mut self, src: &str, from: usize) -> Option<usize> {
        if self.exhausted {
            return None;
        }
        if let Some(at) = self.found.filter(|&at| at >= from) {
            return Some(at);
        }
        self.found = src[from..].find(self.keyword).map(|i| from + i);
        self.exhausted = self.found.is_none();
        self.found
    }
}

/// Property value inside `{...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Str(&'a str),
    Int(u64),
}

type Properties<'a> = Vec<(&'a str, Value<'a>)>;

/// `(var:Label {props})`
struct NodePattern<'a> {
    var: &'a str,
    label: &'a str,
    props: Properties<'a>,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self, lit: &str) -> bool {
        self.skip_ws();
        self.rest().starts_with(lit)
    }

    fn token(&mut self, lit: &str) -> Option<()> {
        if !self.peek(lit) {
            return None;
        }
        self.pos += lit.len();
        Some(())
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    fn quoted(&mut self) -> Option<&'a str> {
        self.token("\"")?;
        let rest = self.rest();
        let end = rest.find('"')?;
        self.pos += end + 1;
        Some(&rest[..end])
    }

    fn number(&mut self) -> Option<u64> {
        self.skip_ws();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let value = rest[..end].parse().ok()?;
        self.pos += end;
        Some(value)
    }

    fn properties(&mut self) -> Option<Properties<'a>> {
        self.token("{")?;
        let mut props = Vec::new();
        if self.token("}").is_some() {
            return Some(props);
        }
        loop {
            let key = self.ident()?;
            self.token(":")?;
            let value = if self.peek("\"") {
                Value::Str(self.quoted()?)
            } else {
                Value::Int(self.number()?)
            };
            props.push((key, value));

            if self.token(",").is_none() {
                self.token("}")?;
                return Some(props);
            }
        }
    }

    fn node_pattern(&mut self) -> Option<NodePattern<'a>> {
        self.token("(")?;
        let var = self.ident()?;
        self.token(":")?;
        let label = self.ident()?;
        let props = self.properties()?;
        self.token(")")?;
        Some(NodePattern { var, label, props })
    }

    /// `(var)` referencing a variable bound by the MATCH clause
    fn bound_var(&mut self, expected: &str) -> Option<()> {
        self.token("(")?;
        if self.ident()? != expected {
            return None;
        }
        self.token(")")
    }

    fn statement(&mut self) -> Option<Statement> {
        if self.peek("CREATE") {
            self.create_statement()
        } else {
            self.match_statement()
        }
    }

    fn create_statement(&mut self) -> Option<Statement> {
        use Value::{Int, Str};

        self.token("CREATE")?;
        let node = self.node_pattern()?;
        self.token(";")?;

        match (node.label, node.props.as_slice()) {
            (
                "KnowledgeNode",
                [("id", Str(id)), ("title", Str(title)), ("description", Str(description)), ("difficulty", Str(difficulty)), ("estimatedMinutes", Int(minutes)), ("source_lesson", Str(source_lesson)), ("source_title", Str(source_title))],
            ) => {
                validate_entity_id(EntityKind::KnowledgeUnit, id).ok()?;
                Some(Statement::CreateUnit(KnowledgeUnit {
                    id: id.to_string(),
                    title: filled(title)?.to_string(),
                    description: filled(description)?.to_string(),
                    difficulty: Difficulty::from_label(filled(difficulty)?),
                    estimated_minutes: u32::try_from(*minutes).ok()?,
                    source_lesson: source_lesson.to_string(),
                    source_title: source_title.to_string(),
                }))
            }
            (
                "Concept",
                [("id", Str(id)), ("name", Str(name)), ("description", Str(description)), ("estimatedMinutes", Int(minutes))],
            ) => {
                validate_entity_id(EntityKind::Concept, id).ok()?;
                Some(Statement::CreateConcept(Concept::new(
                    *id,
                    filled(name)?,
                    filled(description)?,
                    u32::try_from(*minutes).ok()?,
                )))
            }
            (
                "LearningPath",
                [("id", Str(id)), ("name", Str(name)), ("description", Str(description)), ("targetAudience", Str(audience)), ("keyCompetencies", Str(competencies)), ("estimatedMinutes", Int(minutes))],
            ) => {
                validate_entity_id(EntityKind::LearningPath, id).ok()?;
                Some(Statement::CreatePath(LearningPath {
                    id: id.to_string(),
                    name: filled(name)?.to_string(),
                    description: filled(description)?.to_string(),
                    target_audience: audience.to_string(),
                    key_competencies: LearningPath::split_competencies(competencies),
                    estimated_minutes: u32::try_from(*minutes).ok()?,
                    concept_sequence: Vec::new(),
                }))
            }
            // Unrecognized creation shape: ignored
            _ => None,
        }
    }

    fn match_statement(&mut self) -> Option<Statement> {
        use Value::{Int, Str};

        self.token("MATCH")?;
        let a = self.node_pattern()?;
        self.token(",")?;
        let b = self.node_pattern()?;

        self.token("CREATE")?;
        self.bound_var(a.var)?;
        self.token("-")?;
        self.token("[")?;
        self.token(":")?;
        let relation = self.ident()?;
        let props = if self.peek("{") {
            self.properties()?
        } else {
            Vec::new()
        };
        self.token("]")?;
        self.token("->")?;
        self.bound_var(b.var)?;
        self.token(";")?;

        let (a_id, b_id) = (id_only(&a.props)?, id_only(&b.props)?);

        match (a.label, b.label, relation, props.as_slice()) {
            (
                "KnowledgeNode",
                "KnowledgeNode",
                relation,
                [("strength", Int(strength)), ("justification", Str(justification))],
            ) => {
                validate_entity_id(EntityKind::KnowledgeUnit, a_id).ok()?;
                validate_entity_id(EntityKind::KnowledgeUnit, b_id).ok()?;
                Some(Statement::LinkUnits(Relationship::new(
                    a_id,
                    b_id,
                    relation,
                    u32::try_from(*strength).ok()?,
                    filled(justification)?,
                )))
            }
            ("Concept", "KnowledgeNode", "CONTAINS", [("sequence", Int(sequence))]) => {
                validate_entity_id(EntityKind::Concept, a_id).ok()?;
                validate_entity_id(EntityKind::KnowledgeUnit, b_id).ok()?;
                Some(Statement::LinkContains {
                    concept: a_id.to_string(),
                    unit: b_id.to_string(),
                    sequence: u32::try_from(*sequence).ok()?,
                })
            }
            ("LearningPath", "Concept", "INCLUDES", [("sequence", Int(sequence))]) => {
                validate_entity_id(EntityKind::LearningPath, a_id).ok()?;
                validate_entity_id(EntityKind::Concept, b_id).ok()?;
                Some(Statement::LinkIncludes {
                    path: a_id.to_string(),
                    concept: b_id.to_string(),
                    sequence: u32::try_from(*sequence).ok()?,
                })
            }
            ("Concept", "Concept", "PREREQUISITE_FOR", []) => {
                validate_entity_id(EntityKind::Concept, a_id).ok()?;
                validate_entity_id(EntityKind::Concept, b_id).ok()?;
                Some(Statement::LinkPrerequisite {
                    prerequisite: a_id.to_string(),
                    concept: b_id.to_string(),
                })
            }
            // Unrecognized linking shape: ignored
            _ => None,
        }
    }
}

/// MATCH patterns carry exactly `{id: "..."}`
fn id_only<'a>(props: &[(&'a str, Value<'a>)]) -> Option<&'a str> {
    match props {
        [("id", Value::Str(id))] => Some(id),
        _ => None,
    }
}

fn filled(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationKind;

    const UNIT: &str = r#"CREATE (n:KnowledgeNode {
  id: "N1",
  title: "Customer needs",
  description: "Identify what customers need",
  difficulty: "Beginner",
  estimatedMinutes: 15,
  source_lesson: "L01",
  source_title: "Lesson one"
});"#;

    fn statements(script: &str) -> Vec<Statement> {
        StatementScanner::new(script).collect()
    }

    #[test]
    fn test_create_unit() {
        let parsed = statements(UNIT);

        assert_eq!(parsed.len(), 1);
        let Statement::CreateUnit(unit) = &parsed[0] else {
            panic!("expected a unit, got {:?}", parsed[0]);
        };
        assert_eq!(unit.id, "N1");
        assert_eq!(unit.title, "Customer needs");
        assert_eq!(unit.difficulty, Difficulty::Beginner);
        assert_eq!(unit.estimated_minutes, 15);
        assert_eq!(unit.source_lesson, "L01");
        assert_eq!(unit.source_title, "Lesson one");
    }

    #[test]
    fn test_create_concept_and_path() {
        let script = r#"
CREATE (c:Concept {id: "CONCEPT-1", name: "Journeys", description: "Journey maps", estimatedMinutes: 40});
CREATE (p:LearningPath {id: "PATH-1", name: "Foundations", description: "Start here", targetAudience: "New hires", keyCompetencies: "Empathy;Mapping", estimatedMinutes: 120});
CREATE (p:LearningPath {id: "PATH-2", name: "Advanced", description: "Go deeper", targetAudience: "", keyCompetencies: "", estimatedMinutes: 0});
"#;
        let parsed = statements(script);

        assert_eq!(parsed.len(), 3);
        assert!(matches!(&parsed[0], Statement::CreateConcept(c) if c.name == "Journeys" && c.sequence.is_empty()));
        let Statement::CreatePath(path) = &parsed[1] else {
            panic!("expected a path");
        };
        assert_eq!(path.key_competencies, vec!["Empathy", "Mapping"]);
        assert_eq!(path.target_audience, "New hires");
        let Statement::CreatePath(path) = &parsed[2] else {
            panic!("expected a path");
        };
        assert!(path.key_competencies.is_empty());
    }

    #[test]
    fn test_link_statements() {
        let script = r#"
MATCH (a:KnowledgeNode {id: "N1"}), (b:KnowledgeNode {id: "N2"})
CREATE (a)-[:LEADS_TO {strength: 5, justification: "Needs come first"}]->(b);
MATCH (c:Concept {id: "CONCEPT-1"}), (n:KnowledgeNode {id: "N2"})
CREATE (c)-[:CONTAINS {sequence: 3}]->(n);
MATCH (p:LearningPath {id: "PATH-1"}), (c:Concept {id: "CONCEPT-1"})
CREATE (p)-[:INCLUDES {sequence: 1}]->(c);
MATCH (a:Concept {id: "CONCEPT-1"}), (b:Concept {id: "CONCEPT-2"})
CREATE (a)-[:PREREQUISITE_FOR]->(b);
"#;
        let parsed = statements(script);

        assert_eq!(
            parsed,
            vec![
                Statement::LinkUnits(Relationship::new(
                    "N1",
                    "N2",
                    RelationKind::LeadsTo,
                    5,
                    "Needs come first"
                )),
                Statement::LinkContains {
                    concept: "CONCEPT-1".into(),
                    unit: "N2".into(),
                    sequence: 3
                },
                Statement::LinkIncludes {
                    path: "PATH-1".into(),
                    concept: "CONCEPT-1".into(),
                    sequence: 1
                },
                Statement::LinkPrerequisite {
                    prerequisite: "CONCEPT-1".into(),
                    concept: "CONCEPT-2".into()
                },
            ]
        );
    }

    #[test]
    fn test_unrecognized_statements_are_skipped() {
        let script = r#"
// a comment
CREATE INDEX ON :KnowledgeNode(id);
CREATE (x:Lesson {id: "L1"});
CREATE (n:KnowledgeNode {id: "N1", title: "Missing fields"});
MATCH (a:KnowledgeNode {id: "N1"}), (b:KnowledgeNode {id: "N2"})
CREATE (b)-[:LEADS_TO {strength: 1, justification: "wrong direction vars"}]->(a);
MATCH (a:Concept {id: "CONCEPT-1"}), (b:Concept {id: "CONCEPT-2"})
CREATE (a)-[:PREREQUISITE_FOR {strength: 2}]->(b);
"#;
        let mut scanner = StatementScanner::new(script);

        assert!(scanner.next().is_none());
        assert!(scanner.skipped() > 0);
    }

    #[test]
    fn test_malformed_ids_are_rejected() {
        let script = r#"
CREATE (c:Concept {id: "C-1", name: "Bad id", description: "x", estimatedMinutes: 1});
MATCH (c:Concept {id: "CONCEPT-1"}), (n:KnowledgeNode {id: "CONCEPT-2"})
CREATE (c)-[:CONTAINS {sequence: 0}]->(n);
"#;
        assert!(statements(script).is_empty());
    }

    #[test]
    fn test_empty_required_fields_are_rejected() {
        let script = r#"CREATE (c:Concept {id: "CONCEPT-1", name: "", description: "x", estimatedMinutes: 1});"#;
        assert!(statements(script).is_empty());
    }

    #[test]
    fn test_statement_after_garbage_is_recovered() {
        let script = format!("CREATE (broken\nMATCH nonsense;\n{}", UNIT);
        let parsed = statements(&script);

        assert_eq!(parsed.len(), 1);
        assert!(matches!(&parsed[0], Statement::CreateUnit(u) if u.id == "N1"));
    }

    #[test]
    fn test_keywords_inside_strings_do_not_start_statements() {
        let script = r#"CREATE (c:Concept {id: "CONCEPT-1", name: "MATCH basics", description: "CREATE (x:Concept {id: 1});", estimatedMinutes: 5});"#;
        let parsed = statements(script);

        assert_eq!(parsed.len(), 1);
        assert!(matches!(&parsed[0], Statement::CreateConcept(c) if c.name == "MATCH basics"));
    }

    #[test]
    fn test_compact_whitespace_is_accepted() {
        let script = r#"MATCH (a:KnowledgeNode{id:"N1"}),(b:KnowledgeNode{id:"N2"}) CREATE (a)-[:PRECEDES{strength:2,justification:"Order"}]->(b);"#;
        let parsed = statements(script);

        assert_eq!(parsed.len(), 1);
        assert!(matches!(&parsed[0], Statement::LinkUnits(r) if r.relation == RelationKind::Precedes));
    }

    #[test]
    fn test_scan_time_grows_linearly() {
        const UNITS: usize = 10_000;
        let mut script = String::new();
        for i in 1..=UNITS {
            script.push_str(&format!(
                "CREATE (n:KnowledgeNode {{id: \"N{i}\", title: \"Unit {i}\", description: \"d\", difficulty: \"Beginner\", estimatedMinutes: 5, source_lesson: \"L\", source_title: \"T\"}});\n"
            ));
        }
        for i in 1..UNITS {
            script.push_str(&format!(
                "MATCH (a:KnowledgeNode {{id: \"N{i}\"}}), (b:KnowledgeNode {{id: \"N{}\"}}) CREATE (a)-[:LEADS_TO {{strength: 1, justification: \"j\"}}]->(b);\n",
                i + 1
            ));
        }

        let started = std::time::Instant::now();
        let model = parse(&script);
        let elapsed = started.elapsed();

        assert_eq!(model.knowledge_units.len(), UNITS);
        assert_eq!(model.relationships.len(), UNITS - 1);
        assert!(
            elapsed < std::time::Duration::from_secs(5),
            "parsing {} bytes took {:?}",
            script.len(),
            elapsed
        );
    }

    #[test]
    fn test_parse_builds_model() {
        let script = format!(
            "{}\n{}",
            UNIT,
            r#"MATCH (a:KnowledgeNode {id: "N1"}), (b:KnowledgeNode {id: "N9"})
CREATE (a)-[:SUPPORTS {strength: 2, justification: "Dangling"}]->(b);"#
        );
        let model = parse(&script);

        assert_eq!(model.knowledge_units.len(), 1);
        assert_eq!(model.relationships.len(), 1);
        assert_eq!(model.relationships[0].relation, RelationKind::Supports);
    }
}
