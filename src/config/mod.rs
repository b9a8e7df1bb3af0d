// ==========================================
// Appliance Registry - Configuration layer
// ==========================================
// Storage: config_kv table (same database as the documents)
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfigReader, ImportSettings};
