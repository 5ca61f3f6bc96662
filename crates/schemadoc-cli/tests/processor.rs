//! Processor integration tests with a stubbed database connector.

use schemadoc_cli::db::ConnectError;
use schemadoc_cli::processor::{Connector, Processor};
use schemadoc_core::{
    GlobalOptions, Priority, QueryError, QueryExecutor, ResolvedOptions, Row,
};
use std::path::PathBuf;

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Canned results for the six metadata queries, in execution order.
fn canned_results() -> Vec<Vec<Row>> {
    vec![
        vec![Row::from_fields([
            ("schemaname", some("public")),
            ("relname", some("users")),
            ("description", some("Registered users")),
        ])],
        vec![Row::from_fields([
            ("table_name", some("users")),
            ("ordinal_position", some("1")),
            ("column_name", some("id")),
            ("is_nullable", some("NO")),
            ("data_type", some("integer")),
            ("column_default", None),
            ("character_maximum_length", None),
            ("numeric_precision", some("32")),
            ("description", None),
        ])],
        vec![],
        vec![Row::from_fields([
            ("routine_name", some("add_user")),
            ("specific_name", some("add_user_1")),
            ("data_type", some("integer")),
            ("routine_definition", some("SELECT 1")),
            ("external_language", some("SQL")),
        ])],
        vec![Row::from_fields([
            ("specific_name", some("add_user_1")),
            ("parameter_name", some("p_name")),
            ("parameter_mode", some("IN")),
            ("data_type", some("text")),
            ("parameter_default", None),
        ])],
        vec![],
    ]
}

struct StubExecutor {
    results: Vec<Vec<Row>>,
}

impl QueryExecutor for StubExecutor {
    fn fetch_rows(&mut self, _sql: &str) -> Result<Vec<Row>, QueryError> {
        if self.results.is_empty() {
            return Err(QueryError::Execution("out of canned results".into()));
        }
        Ok(self.results.remove(0))
    }
}

struct StubConnector {
    results: Vec<Vec<Row>>,
}

impl Connector for StubConnector {
    fn connect(&self, _: &ResolvedOptions) -> Result<Box<dyn QueryExecutor>, ConnectError> {
        Ok(Box::new(StubExecutor {
            results: self.results.clone(),
        }))
    }
}

struct RefusingConnector;

impl Connector for RefusingConnector {
    fn connect(&self, _: &ResolvedOptions) -> Result<Box<dyn QueryExecutor>, ConnectError> {
        Err(ConnectError::Runtime(std::io::Error::other(
            "connection refused",
        )))
    }
}

fn processor_with(connector: Box<dyn Connector>, project_dir: PathBuf) -> Processor {
    Processor::with_connector(
        GlobalOptions::default(),
        project_dir,
        Priority::Tag,
        true,
        connector,
    )
}

#[test]
fn directive_renders_documentation_with_default_template() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) =
        processor.process_document("# Database\n\n<schemadoc/>\n\nEnd.\n");

    assert!(!had_errors);
    assert!(processed.starts_with("# Database\n\n"));
    assert!(processed.ends_with("\n\nEnd.\n"));
    assert!(processed.contains("## public.users"));
    assert!(processed.contains("Registered users"));
    assert!(processed.contains("| 1 | id | integer | NO |"));
    assert!(processed.contains("## add_user"));
    assert!(processed.contains("| p_name | IN | text |"));

    // The default template was provisioned into the project dir.
    assert!(dir.path().join("schemadoc.md.j2").exists());
    assert!(!dir.path().join("scheme.puml.j2").exists());
}

#[test]
fn draw_appends_scheme_after_documentation() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) = processor.process_document("<schemadoc draw=\"true\"/>");

    assert!(!had_errors);
    let doc_part = processed.split("@startuml").next().unwrap();
    assert!(doc_part.contains("## public.users"));
    assert!(processed.contains("@startuml"));
    assert!(processed.contains("entity \"users\""));
    assert!(processed.ends_with("@enduml\n"));
    assert!(dir.path().join("scheme.puml.j2").exists());
}

#[test]
fn connection_failure_degrades_to_empty_substitution() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(Box::new(RefusingConnector), dir.path().to_path_buf());

    let (processed, had_errors) = processor.process_document("before <schemadoc/> after");

    assert_eq!(processed, "before  after");
    assert!(!had_errors);
}

#[test]
fn failing_query_degrades_to_empty_substitution() {
    let dir = tempfile::tempdir().unwrap();
    // Only the first query succeeds; the second errors.
    let processor = processor_with(
        Box::new(StubConnector {
            results: vec![vec![]],
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) = processor.process_document("x<schemadoc/>y");

    assert_eq!(processed, "xy");
    assert!(!had_errors);
}

#[test]
fn unknown_attribute_is_a_loud_error() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) = processor.process_document("x<schemadoc hostname=\"db\"/>y");

    assert_eq!(processed, "xy");
    assert!(had_errors);
}

#[test]
fn bad_option_value_is_a_loud_error() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (_, had_errors) = processor.process_document("<schemadoc port=\"banana\"/>");

    assert!(had_errors);
}

#[test]
fn missing_custom_template_degrades_to_empty_substitution() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) =
        processor.process_document("<schemadoc doc_template=\"missing.j2\"/>");

    assert_eq!(processed, "");
    assert!(!had_errors);
    // A custom name is never provisioned from the default source.
    assert!(!dir.path().join("missing.j2").exists());
}

#[test]
fn edited_template_on_disk_wins_over_builtin() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("schemadoc.md.j2"),
        "tables: {% for table in tables %}{{ table.name }}{% endfor %}",
    )
    .unwrap();

    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) = processor.process_document("<schemadoc/>");

    assert!(!had_errors);
    assert_eq!(processed, "tables: users");
}

#[test]
fn each_directive_gets_a_fresh_connection() {
    let dir = tempfile::tempdir().unwrap();
    let processor = processor_with(
        Box::new(StubConnector {
            results: canned_results(),
        }),
        dir.path().to_path_buf(),
    );

    let (processed, had_errors) = processor.process_document("<schemadoc/>|<schemadoc/>");

    assert!(!had_errors);
    let parts: Vec<&str> = processed.split('|').collect();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains("## public.users"));
    assert!(parts[1].contains("## public.users"));
}
