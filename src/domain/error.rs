//! Domain-level errors and import warnings (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Domain errors represent violations of the tree invariants or malformed input.
/// A failed operation never leaves the forest partially modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("node not found: {0}")]
    NotFound(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("cycle detected: {node} cannot be placed under {parent}")]
    CycleDetected { node: String, parent: String },

    #[error("cannot write records: {0}")]
    Write(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Non-fatal findings of an import. The import still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// Every record was isolated and filtered away.
    EmptyResult { records: usize },
    /// A later record replaced an earlier one with the same id.
    DuplicateId(String),
    /// A parent link was dropped because it would close a cycle.
    CycleBroken { id: String, parent_id: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::EmptyResult { records } => write!(
                f,
                "all {} records are isolated (no parent and no children) and are hidden",
                records
            ),
            ImportWarning::DuplicateId(id) => {
                write!(f, "duplicate id {}: the later record replaces the earlier one", id)
            }
            ImportWarning::CycleBroken { id, parent_id } => write!(
                f,
                "parent link {} -> {} would close a cycle, {} becomes a root",
                id, parent_id, id
            ),
        }
    }
}
