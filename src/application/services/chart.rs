//! Chart file service
//!
//! Reads organization records from delimited files and writes them back.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, EditorSession, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    flatten, parse_records, write_records, DomainError, FlatRecord, ImportWarning, OrgForest,
};
use crate::infrastructure::traits::FileSystem;

/// Result of importing a chart file.
#[derive(Debug)]
pub struct ImportOutcome {
    /// Number of parsed rows
    pub records: usize,
    /// Session holding the built forest, editor closed
    pub session: EditorSession,
    pub warnings: Vec<ImportWarning>,
}

/// Service for importing and exporting chart files.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ChartService {
    /// Create a new chart service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    fn delimiter(&self) -> ApplicationResult<u8> {
        let delimiter = self.settings.delimiter;
        u8::try_from(delimiter)
            .ok()
            .filter(|d| d.is_ascii() && *d != b'"' && *d != b'\n')
            .ok_or_else(|| ApplicationError::Config {
                message: format!("unsupported delimiter: {:?}", delimiter),
            })
    }

    /// Parse the records of a chart file without building a tree.
    ///
    /// Content that is not UTF-8 is malformed input, reported with the line
    /// of the first bad byte.
    #[instrument(level = "debug", skip(self))]
    pub fn read_records(&self, path: &Path) -> ApplicationResult<Vec<FlatRecord>> {
        let delimiter = self.delimiter()?;
        let bytes = self.fs.read(path).with_path_context("read chart", path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            DomainError::Parse {
                line: valid.iter().filter(|&&b| b == b'\n').count() as u64 + 1,
                message: "invalid UTF-8".to_string(),
            }
        })?;
        let records = parse_records(&content, delimiter)?;
        debug!("read_records: {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read and parse a chart file, then import it into a fresh session.
    ///
    /// Any parse failure aborts the import; nothing is built from a partial file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<ImportOutcome> {
        let records = self.read_records(path)?;
        let mut session = EditorSession::new(&self.settings);
        let warnings = session.import(&records)?;
        Ok(ImportOutcome {
            records: records.len(),
            session,
            warnings,
        })
    }

    /// Render the forest as delimited text.
    pub fn render_csv(&self, forest: &OrgForest) -> ApplicationResult<String> {
        self.render_records(&flatten(forest))
    }

    pub fn render_records(&self, records: &[FlatRecord]) -> ApplicationResult<String> {
        Ok(write_records(records, self.delimiter()?)?)
    }

    /// Write the forest to `path`, parent rows before their children.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn save(&self, forest: &OrgForest, path: &Path) -> ApplicationResult<()> {
        let content = self.render_csv(forest)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write chart", path)?;
        debug!("save: {} nodes to {}", forest.len(), path.display());
        Ok(())
    }
}
