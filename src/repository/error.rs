// ==========================================
// Appliance Registry - Repository errors
// ==========================================
// Tool: thiserror derive
// Rule: every storage failure surfaces as a RepositoryError;
// the importer records it against the row being written
// ==========================================

use thiserror::Error;

/// Repository layer error
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Lookup errors =====
    #[error("record not found: {collection} with {filter}")]
    NotFound { collection: String, filter: String },

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    // ===== Database errors =====
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database lock failed: {0}")]
    LockError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("duplicate key: {0}")]
    UniqueConstraintViolation(String),

    // ===== Document errors =====
    #[error("document failed validation ({collection}): {message}")]
    SchemaViolation { collection: String, message: String },

    #[error("document serialization failed: {0}")]
    SerializationError(String),

    // ===== General =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
