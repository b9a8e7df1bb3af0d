// ==========================================
// Appliance Registry - Config manager
// ==========================================
// Responsibility: config lookup and overrides
// Storage: config_kv table (key-value + scope), global scope only
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::importer::entity_registry::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Opens the database file and makes sure config_kv exists
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection (PRAGMAs are re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Reads a global-scope value
    ///
    /// # Returns
    /// - Some(String): configured value
    /// - None: key not set
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Upserts a global-scope value
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// All global-scope values as a JSON object, sorted by key
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(serde_json::to_string(&config_map)?)
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> RepositoryResult<bool> {
        Ok(match self.get_global_config_value(key)? {
            Some(value) => matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
            None => default,
        })
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn is_verbose(&self) -> RepositoryResult<bool> {
        self.get_bool_or_default(config_keys::IMPORT_VERBOSE, false)
    }

    async fn get_sheet_override(&self, kind: EntityKind) -> RepositoryResult<Option<String>> {
        let key = config_keys::sheet_override(kind);
        Ok(self
            .get_global_config_value(&key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    async fn keep_staged_files(&self) -> RepositoryResult<bool> {
        self.get_bool_or_default(config_keys::IMPORT_KEEP_STAGED_FILES, false)
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    use crate::importer::entity_registry::EntityKind;

    pub const IMPORT_VERBOSE: &str = "import.verbose";
    pub const IMPORT_KEEP_STAGED_FILES: &str = "import.keep_staged_files";
    pub const IMPORT_SHEET_OVERRIDE_PREFIX: &str = "import.sheet_override.";

    /// `import.sheet_override.<entityType>`
    pub fn sheet_override(kind: EntityKind) -> String {
        format!("{}{}", IMPORT_SHEET_OVERRIDE_PREFIX, kind.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let settings = manager().load_import_settings().await.unwrap();
        assert!(!settings.verbose);
        assert!(!settings.keep_staged_files);
        assert!(settings.sheet_overrides.is_empty());
    }

    #[tokio::test]
    async fn test_overrides_are_read() {
        let config = manager();
        config.set_global_config_value(config_keys::IMPORT_VERBOSE, "true").unwrap();
        config
            .set_global_config_value(&config_keys::sheet_override(EntityKind::UserFuels), "Links")
            .unwrap();
        // second write replaces the first
        config
            .set_global_config_value(&config_keys::sheet_override(EntityKind::UserFuels), "Fuel Links")
            .unwrap();

        let settings = config.load_import_settings().await.unwrap();
        assert!(settings.verbose);
        assert_eq!(settings.sheet_override(EntityKind::UserFuels), Some("Fuel Links"));

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 2);
    }
}
