// ==========================================
// Appliance Registry - Core library
// ==========================================
// Regulated heating appliance & fuel registry
// Spreadsheet import, reconciliation and query backend
// Stack: Rust + SQLite (JSON documents)
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - records and enums
pub mod domain;

// Repository - document persistence
pub mod repository;

// Importer - spreadsheet → registry
pub mod importer;

// Config - config_kv backed settings
pub mod config;

// Database bootstrap (connection PRAGMAs, schema)
pub mod db;

// Logging
pub mod logging;

// API - query/delete operations
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::types::{ApplianceType, AssignmentStatus, FuelBagging, UserRole};

pub use domain::{Appliance, EntityRequest, Fuel, ImportSummary, RowError, User, UserAppliance, UserFuel};

pub use importer::{import_batch, BatchImporter, EntityKind, ImportError, StagedUpload, Workbook};

pub use repository::{DocumentStore, SqliteDocumentStore};

pub use config::{ConfigManager, ImportSettings};

pub use api::RegistryApi;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Appliance Registry";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_every_kind_has_a_collection_schema() {
        for kind in EntityKind::ALL {
            assert!(repository::schema_for(kind.collection_name()).is_ok());
        }
    }
}
