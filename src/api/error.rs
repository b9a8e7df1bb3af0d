// ==========================================
// Appliance Registry - API errors
// ==========================================
// Responsibility: map repository/import failures onto
// caller-facing categories (bad input, missing record, conflict)
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer error
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Caller errors =====
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    ValidationError(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    // ===== Backend errors =====
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("import failed: {0}")]
    ImportError(String),

    // ===== General =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { collection, filter } => {
                ApiError::NotFound(format!("{} with {}", collection, filter))
            }
            RepositoryError::UnknownCollection(name) => {
                ApiError::InvalidInput(format!("unknown collection: {}", name))
            }
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::DuplicateKey(msg),
            RepositoryError::SchemaViolation { collection, message } => {
                ApiError::ValidationError(format!("{}: {}", collection, message))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::LockError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::SerializationError(msg) | RepositoryError::InternalError(msg) => {
                ApiError::InternalError(msg)
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(inner) => inner.into(),
            ImportError::UnknownEntityType(name) => {
                ApiError::InvalidInput(format!("Unknown entity type: {}", name))
            }
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;
