//! Tests for ChartService file import/export

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use orgtree::application::ApplicationError;
use orgtree::config::Settings;
use orgtree::domain::{DomainError, ImportWarning};
use orgtree::infrastructure::di::ServiceContainer;
use orgtree::util::testing;

const CHARTS: &str = "tests/resources/charts";

fn chart(name: &str) -> std::path::PathBuf {
    Path::new(CHARTS).join(name)
}

#[test]
fn given_chart_file_when_loading_then_builds_forest_without_isolated_members() {
    testing::init_test_setup();
    // Arrange
    let container = ServiceContainer::new(Settings::default());

    // Act
    let outcome = container.chart.load(&chart("acme.csv")).unwrap();

    // Assert
    assert_eq!(outcome.records, 7);
    assert_eq!(outcome.session.forest().len(), 6);
    assert!(!outcome.session.forest().contains("6"));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn given_multi_root_chart_when_loading_then_keeps_both_trees() {
    let container = ServiceContainer::new(Settings::default());

    let outcome = container.chart.load(&chart("multi_root.csv")).unwrap();

    assert_eq!(outcome.session.forest().roots().len(), 2);
    assert!(!outcome.session.forest().contains("z"));
}

#[test]
fn given_isolated_chart_when_loading_then_empty_with_warning() {
    let container = ServiceContainer::new(Settings::default());

    let outcome = container.chart.load(&chart("isolated.csv")).unwrap();

    assert!(outcome.session.forest().is_empty());
    assert_eq!(
        outcome.warnings,
        vec![ImportWarning::EmptyResult { records: 2 }]
    );
}

#[test]
fn given_malformed_chart_when_loading_then_parse_error() {
    let container = ServiceContainer::new(Settings::default());

    let result = container.chart.load(&chart("malformed.csv"));

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Parse { .. }))
    ));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_with_path() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(Settings::default());
    let path = temp.path().join("nope.csv");

    let result = container.chart.load(&path);

    match result {
        Err(ApplicationError::OperationFailed { context, .. }) => {
            assert!(context.contains("nope.csv"), "{}", context);
        }
        other => panic!("expected OperationFailed, got {:?}", other),
    }
}

#[test]
fn given_semicolon_setting_when_loading_then_uses_configured_delimiter() {
    let settings = Settings {
        delimiter: ';',
        ..Default::default()
    };
    let container = ServiceContainer::new(settings);

    let outcome = container.chart.load(&chart("semicolon.csv")).unwrap();

    assert_eq!(outcome.session.forest().get("1").unwrap().data.name, "Müller, Anna");
}

#[test]
fn given_unsupported_delimiter_when_loading_then_config_error() {
    let settings = Settings {
        delimiter: 'ä',
        ..Default::default()
    };
    let container = ServiceContainer::new(settings);

    let result = container.chart.load(&chart("acme.csv"));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_edited_session_when_saving_then_file_reloads_identically() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(Settings::default());
    let mut session = container.chart.load(&chart("acme.csv")).unwrap().session;
    let mut form = session.begin_new_node();
    form.id = "8".into();
    form.name = "Hal Gray".into();
    form.title = "Intern".into();
    form.parent_id = Some("4".into());
    session.submit(form).unwrap();
    let target = temp.path().join("out").join("acme.csv");

    // Act
    container.chart.save(session.forest(), &target).unwrap();

    // Assert
    let text = fs::read_to_string(&target).unwrap();
    assert!(text.starts_with("id,name,title,department,parentId,imageUrl\n1,Alice Chen,"));
    assert!(text.contains("\n4,Dan Brown,Engineer,Engineering,2,\n8,Hal Gray,Intern,,4,\n"));
    let reloaded = container.chart.load(&target).unwrap();
    assert_eq!(
        container.chart.render_csv(reloaded.session.forest()).unwrap(),
        text
    );
}

#[test]
fn given_loaded_chart_when_exporting_then_parents_come_first() {
    let container = ServiceContainer::new(Settings::default());
    let outcome = container.chart.load(&chart("acme.csv")).unwrap();

    let text = container
        .chart
        .render_records(&outcome.session.export_records())
        .unwrap();

    let ids: Vec<&str> = text
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .collect();
    assert_eq!(ids, vec!["1", "2", "4", "5", "3", "7"]);
}

#[test]
fn given_non_utf8_chart_when_loading_then_parse_error_with_line() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("latin1.csv");
    fs::write(&path, b"id,name,parentId\n1,Ann,\n2,J\xf6rg,1\n").unwrap();
    let container = ServiceContainer::new(Settings::default());

    // Act
    let result = container.chart.load(&path);

    // Assert
    match result {
        Err(ApplicationError::Domain(DomainError::Parse { line, .. })) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn given_crowded_short_ids_when_loading_then_new_node_gets_free_id() {
    // Arrange: every one-character id is taken
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("crowded.csv");
    let mut text = String::from("id,name,parentId\n");
    for c in "0123456789abcdef".chars() {
        text.push_str(&format!("{c},Lead {c},\n{c}{c}x,Report {c},{c}\n"));
    }
    fs::write(&path, text).unwrap();
    let settings = Settings {
        id_length: 1,
        ..Default::default()
    };
    let container = ServiceContainer::new(settings);
    let mut session = container.chart.load(&path).unwrap().session;

    // Act
    let form = session.begin_new_node();
    let root = session.display().unwrap();

    // Assert
    assert!(!session.forest().contains(&form.id));
    assert_eq!(root.child_count(), 16);
    assert!(!session.forest().contains(root.id().unwrap()));
}
