// ==========================================
// Appliance Registry - Import errors
// ==========================================
// Tool: thiserror derive
// Row-level variants render the exact text stored in
// ImportSummary.errors (e.g. "Missing fuelId")
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// Import module error
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("Sheet \"{0}\" not found in workbook")]
    SheetNotFound(String),

    // ===== Row errors =====
    #[error("Missing {field}")]
    MissingField { field: String },

    #[error("Invalid number for {field}: {value}")]
    TypeConversionError { field: String, value: String },

    // ===== Request errors =====
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    // ===== Store errors =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== Output errors =====
    #[error("template write failed: {0}")]
    TemplateWriteError(String),

    // ===== General =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    pub fn missing(field: &str) -> Self {
        ImportError::MissingField {
            field: field.to_string(),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InternalError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
