// ==========================================
// Appliance Registry - Import configuration reader
// ==========================================
// Responsibility: the settings the batch importer consumes
// Implementors: ConfigManager (config_kv table), ImportSettings (in-code)
// Rule: read-only; missing keys fall back to defaults
// ==========================================

use crate::importer::entity_registry::EntityKind;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

// ==========================================
// ImportSettings - resolved import configuration
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSettings {
    /// Log each inserted/updated row at info instead of debug
    pub verbose: bool,
    /// entity type name → sheet name
    pub sheet_overrides: HashMap<String, String>,
    /// Leave staged upload files on disk after the batch
    pub keep_staged_files: bool,
}

impl ImportSettings {
    pub fn sheet_override(&self, kind: EntityKind) -> Option<&str> {
        self.sheet_overrides.get(kind.type_name()).map(String::as_str)
    }

    pub fn with_sheet_override(mut self, kind: EntityKind, sheet_name: &str) -> Self {
        self.sheet_overrides
            .insert(kind.type_name().to_string(), sheet_name.to_string());
        self
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Default: false
    async fn is_verbose(&self) -> RepositoryResult<bool>;

    /// Site-wide sheet name for an entity type (None = registry default)
    async fn get_sheet_override(&self, kind: EntityKind) -> RepositoryResult<Option<String>>;

    /// Default: false
    async fn keep_staged_files(&self) -> RepositoryResult<bool>;

    /// Reads every import setting at once
    async fn load_import_settings(&self) -> RepositoryResult<ImportSettings> {
        let mut sheet_overrides = HashMap::new();
        for kind in EntityKind::ALL {
            if let Some(sheet) = self.get_sheet_override(kind).await? {
                sheet_overrides.insert(kind.type_name().to_string(), sheet);
            }
        }
        Ok(ImportSettings {
            verbose: self.is_verbose().await?,
            sheet_overrides,
            keep_staged_files: self.keep_staged_files().await?,
        })
    }
}

#[async_trait]
impl ImportConfigReader for ImportSettings {
    async fn is_verbose(&self) -> RepositoryResult<bool> {
        Ok(self.verbose)
    }

    async fn get_sheet_override(&self, kind: EntityKind) -> RepositoryResult<Option<String>> {
        Ok(self.sheet_override(kind).map(str::to_string))
    }

    async fn keep_staged_files(&self) -> RepositoryResult<bool> {
        Ok(self.keep_staged_files)
    }
}
