//! Tests for the delimited record codec

use std::fs;

use rstest::rstest;

use orgtree::domain::{parse_records, write_records, DomainError};

const CHARTS: &str = "tests/resources/charts";

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("{}/{}", CHARTS, name)).unwrap()
}

#[test]
fn given_acme_chart_when_parsing_then_reads_all_rows() {
    // Act
    let records = parse_records(&fixture("acme.csv"), b',').unwrap();

    // Assert
    assert_eq!(records.len(), 7);
    let alice = &records[0];
    assert_eq!(alice.name, "Alice Chen");
    assert_eq!(alice.parent_id, None);
    assert_eq!(alice.image_url, "https://example.com/alice.jpg");
    assert_eq!(records[1].parent_id.as_deref(), Some("1"));
    assert_eq!(records[5].department, "");
}

#[test]
fn given_extra_columns_when_parsing_then_ignores_them() {
    let records = parse_records(&fixture("multi_root.csv"), b',').unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records[0].title, "");
    assert_eq!(records[4].parent_id.as_deref(), Some("missing"));
}

#[test]
fn given_semicolon_chart_when_parsing_with_semicolon_then_keeps_commas_in_names() {
    let records = parse_records(&fixture("semicolon.csv"), b';').unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Müller, Anna");
    assert_eq!(records[1].parent_id.as_deref(), Some("1"));
}

#[test]
fn given_row_with_extra_field_when_parsing_then_whole_parse_fails() {
    // Act
    let result = parse_records(&fixture("malformed.csv"), b',');

    // Assert
    match result {
        Err(DomainError::Parse { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("expected 6 fields"), "{}", message);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[rstest]
#[case::no_id("name,parentId\nAnn,\n")]
#[case::wrong_case("ID,name\n1,Ann\n")]
fn given_missing_id_column_when_parsing_then_errors(#[case] text: &str) {
    assert_eq!(
        parse_records(text, b','),
        Err(DomainError::MissingColumn("id".into()))
    );
}

#[test]
fn given_header_only_when_parsing_then_no_records() {
    let records = parse_records("id,name\n", b',').unwrap();
    assert!(records.is_empty());
}

#[rstest]
#[case(b',')]
#[case(b';')]
#[case(b'\t')]
fn given_parsed_chart_when_writing_then_parses_back_identically(#[case] delimiter: u8) {
    // Arrange
    let records = parse_records(&fixture("acme.csv"), b',').unwrap();

    // Act
    let text = write_records(&records, delimiter).unwrap();

    // Assert
    assert!(text.starts_with(&format!(
        "id{d}name{d}title{d}department{d}parentId{d}imageUrl\n",
        d = delimiter as char
    )));
    assert_eq!(parse_records(&text, delimiter).unwrap(), records);
}
