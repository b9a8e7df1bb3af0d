// ==========================================
// Appliance Registry - Repository layer
// ==========================================
// Responsibility: document persistence, no import rules
// Constraint: every query is parameterized
// ==========================================

pub mod collection_schema;
pub mod document_store;
pub mod error;
pub mod sqlite_store;

pub use collection_schema::{schema_for, CollectionSchema, SCHEMAS};
pub use document_store::{DocumentStore, Page};
pub use error::{RepositoryError, RepositoryResult};
pub use sqlite_store::SqliteDocumentStore;
