// ==========================================
// Appliance Registry - SQLite bootstrap
// ==========================================
// - Uniform PRAGMAs for every Connection::open
// - Schema: schema_version, config_kv, one document table per
//   collection with unique json_extract indexes
// ==========================================

use crate::repository::collection_schema::SCHEMAS;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version written by `init_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Environment variable naming the database file explicitly
pub const DB_PATH_ENV: &str = "APPLIANCE_REGISTRY_DB_PATH";

/// Database location: APPLIANCE_REGISTRY_DB_PATH, then the platform
/// data directory, then ./appliance_registry.db
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./appliance_registry.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("appliance-registry");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("registry.db");
        }
    }
    path.to_string_lossy().to_string()
}

/// Applies the per-connection PRAGMAs
///
/// foreign_keys and busy_timeout are connection-scoped in SQLite
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Opens a connection with the uniform configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Creates every table and index if missing (idempotent)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    for schema in SCHEMAS.iter() {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                _id TEXT PRIMARY KEY,
                doc TEXT NOT NULL,
                created_at TEXT,
                updated_at TEXT
            );
            CREATE INDEX IF NOT EXISTS ix_{table}_created_at ON {table} (created_at);",
            table = schema.table
        ))?;

        for key_fields in schema.unique {
            let columns: Vec<String> = key_fields
                .iter()
                .map(|f| format!("json_extract(doc, '$.{}')", f))
                .collect();
            conn.execute_batch(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_{table}_{name} ON {table} ({columns});",
                table = schema.table,
                name = key_fields.join("_"),
                columns = columns.join(", ")
            ))?;
        }
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Reads schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
