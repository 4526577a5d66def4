use std::path::PathBuf;

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read source table {path}: {message}")]
    SourceRead { path: Utf8PathBuf, message: String },

    #[error("malformed source table {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("source table {path} has no {column:?} column")]
    MissingColumn { path: Utf8PathBuf, column: String },

    #[error("invalid number value {value:?} in column {field} ({path}, line {line})")]
    InvalidNumber {
        path: Utf8PathBuf,
        line: u64,
        field: String,
        value: String,
    },

    #[error("missing required value in column {field} ({path}, line {line})")]
    MissingRequiredField {
        path: Utf8PathBuf,
        line: u64,
        field: String,
    },

    #[error(
        "organism {taxonomy_id} has inconsistent {field}: {existing:?} (earlier genome) vs {incoming:?} ({accession})"
    )]
    InconsistentOrganism {
        taxonomy_id: String,
        field: &'static str,
        existing: String,
        incoming: String,
        accession: String,
    },

    #[error("failed to write catalog file {path}: {message}")]
    OutputWrite { path: Utf8PathBuf, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(String),
}

impl CatalogError {
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CatalogError::SourceRead { .. }
                | CatalogError::Parse { .. }
                | CatalogError::MissingColumn { .. }
                | CatalogError::InvalidNumber { .. }
                | CatalogError::MissingRequiredField { .. }
                | CatalogError::InconsistentOrganism { .. }
        )
    }
}
