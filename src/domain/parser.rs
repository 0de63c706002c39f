//! Delimited text codec for flat records.
//!
//! Columns are matched by exact header name; unknown columns are ignored.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, instrument};

use crate::domain::entities::FlatRecord;
use crate::domain::error::{DomainError, DomainResult};

/// Column order used for export.
pub const COLUMNS: [&str; 6] = ["id", "name", "title", "department", "parentId", "imageUrl"];

/// Header positions of the recognized columns.
struct Columns {
    id: usize,
    name: Option<usize>,
    title: Option<usize>,
    department: Option<usize>,
    parent_id: Option<usize>,
    image_url: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> DomainResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Ok(Self {
            id: find("id").ok_or_else(|| DomainError::MissingColumn("id".to_string()))?,
            name: find("name"),
            title: find("title"),
            department: find("department"),
            parent_id: find("parentId"),
            image_url: find("imageUrl"),
        })
    }

    fn record(&self, row: &StringRecord) -> FlatRecord {
        let field = |col: Option<usize>| {
            col.and_then(|c| row.get(c))
                .unwrap_or_default()
                .to_string()
        };
        let parent_id = field(self.parent_id);
        FlatRecord {
            id: field(Some(self.id)),
            name: field(self.name),
            title: field(self.title),
            department: field(self.department),
            parent_id: (!parent_id.is_empty()).then_some(parent_id),
            image_url: field(self.image_url),
        }
    }
}

fn parse_error(err: csv::Error) -> DomainError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} fields, found {}", expected_len, len),
        _ => err.to_string(),
    };
    DomainError::Parse { line, message }
}

/// Parse delimited text with a header row. Any malformed row aborts the whole parse.
#[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse_records(text: &str, delimiter: u8) -> DomainResult<Vec<FlatRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(parse_error)?.clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(parse_error)?;
        records.push(columns.record(&row));
    }
    debug!("parsed {} records", records.len());
    Ok(records)
}

/// Render records as delimited text, header first, roots with empty parentId.
#[instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn write_records(records: &[FlatRecord], delimiter: u8) -> DomainResult<String> {
    let write_err = |e: csv::Error| DomainError::Write(e.to_string());
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS).map_err(write_err)?;
    for record in records {
        writer
            .write_record([
                record.id.as_str(),
                record.name.as_str(),
                record.title.as_str(),
                record.department.as_str(),
                record.parent_id.as_deref().unwrap_or_default(),
                record.image_url.as_str(),
            ])
            .map_err(write_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DomainError::Write(e.to_string()))
}
