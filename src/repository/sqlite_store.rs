// ==========================================
// Appliance Registry - SQLite document store
// ==========================================
// One table per collection: (_id, doc JSON, created_at, updated_at)
// Filters compile to json_extract equality, text search to
// LOWER(...) LIKE over the searched fields; all values are bound
// Documents are validated against their collection schema before
// every write
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::document::{fields, format_timestamp, str_field, Document, Filter};
use crate::repository::collection_schema::{schema_for, CollectionSchema};
use crate::repository::document_store::{DocumentStore, Page};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// ==========================================
// SqliteDocumentStore
// ==========================================
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Wraps an existing connection (schema must already exist)
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the database file and bootstraps the schema
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    /// Shared connection handle (config reads use the same database)
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

// ==========================================
// SQL helpers
// ==========================================

/// WHERE clause + bound values for an equality filter
fn where_clause(filter: &Filter) -> (String, Vec<String>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut conditions = Vec::new();
    let mut values = Vec::new();
    for (field, value) in filter.conditions() {
        if field == fields::ID {
            conditions.push(format!("_id = ?{}", values.len() + 1));
        } else {
            conditions.push(format!(
                "json_extract(doc, ?{}) = ?{}",
                values.len() + 1,
                values.len() + 2
            ));
            values.push(format!("$.{}", field));
        }
        values.push(value.clone());
    }
    (format!(" WHERE {}", conditions.join(" AND ")), values)
}

/// WHERE clause + bound values matching `text` as a substring of any field
///
/// LIKE wildcards in `text` are escaped so they match literally
fn search_clause(fields: &[&str], text: &str) -> (String, Vec<String>) {
    let escaped = text
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{}%", escaped);

    let mut conditions = Vec::new();
    let mut values = Vec::new();
    for field in fields {
        conditions.push(format!(
            "LOWER(json_extract(doc, ?{})) LIKE ?{} ESCAPE '\\'",
            values.len() + 1,
            values.len() + 2
        ));
        values.push(format!("$.{}", field));
        values.push(pattern.clone());
    }
    if conditions.is_empty() {
        // nothing searchable matches nothing
        return (" WHERE 0".to_string(), values);
    }
    (format!(" WHERE ({})", conditions.join(" OR ")), values)
}

fn decode(id: String, raw: &str) -> RepositoryResult<Document> {
    let mut doc: Document = serde_json::from_str(raw)?;
    doc.insert(fields::ID.to_string(), Value::String(id));
    Ok(doc)
}

fn select_one(
    conn: &Connection,
    schema: &CollectionSchema,
    filter: &Filter,
) -> RepositoryResult<Option<Document>> {
    let (clause, values) = where_clause(filter);
    let sql = format!(
        "SELECT _id, doc FROM {}{} ORDER BY created_at LIMIT 1",
        schema.table, clause
    );
    let row: Option<(String, String)> = conn
        .query_row(&sql, params_from_iter(values.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;
    row.map(|(id, raw)| decode(id, &raw)).transpose()
}

fn select_page(
    conn: &Connection,
    schema: &CollectionSchema,
    clause: &str,
    values: &[String],
    page: Page,
) -> RepositoryResult<Vec<Document>> {
    let sql = format!(
        "SELECT _id, doc FROM {}{} ORDER BY created_at DESC, _id LIMIT {} OFFSET {}",
        schema.table, clause, page.limit, page.skip
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut documents = Vec::new();
    for row in rows {
        let (id, raw) = row?;
        documents.push(decode(id, &raw)?);
    }
    Ok(documents)
}

fn timestamp_of(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

// ==========================================
// DocumentStore impl
// ==========================================
#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> RepositoryResult<Option<Document>> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;
        select_one(&conn, schema, filter)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        page: Page,
    ) -> RepositoryResult<Vec<Document>> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;
        let (clause, values) = where_clause(filter);
        select_page(&conn, schema, &clause, &values, page)
    }

    async fn search(
        &self,
        collection: &str,
        fields: &[&str],
        text: &str,
        page: Page,
    ) -> RepositoryResult<Vec<Document>> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;
        let (clause, values) = search_clause(fields, text);
        select_page(&conn, schema, &clause, &values, page)
    }

    async fn count_matching(&self, collection: &str, fields: &[&str], text: &str) -> RepositoryResult<u64> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;
        let (clause, values) = search_clause(fields, text);
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}{}", schema.table, clause),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> RepositoryResult<String> {
        let schema = schema_for(collection)?;

        let id = str_field(&document, fields::ID)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        document.insert(fields::ID.to_string(), Value::String(id.clone()));

        let now = format_timestamp(Utc::now());
        for field in [fields::CREATED_AT, fields::UPDATED_AT] {
            if timestamp_of(&document, field).is_none() {
                document.insert(field.to_string(), Value::String(now.clone()));
            }
        }
        schema.validate(&document)?;

        let conn = self.get_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (_id, doc, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                schema.table
            ),
            params![
                id,
                serde_json::to_string(&document)?,
                timestamp_of(&document, fields::CREATED_AT),
                timestamp_of(&document, fields::UPDATED_AT),
            ],
        )?;
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
    ) -> RepositoryResult<bool> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;

        let mut merged = match select_one(&conn, schema, filter)? {
            Some(doc) => doc,
            None => return Ok(false),
        };
        let id = str_field(&merged, fields::ID)
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::InternalError("stored document without _id".into()))?;

        let stamps_update = changes.contains_key(fields::UPDATED_AT);
        for (key, value) in changes {
            if key == fields::CREATED_AT || key == fields::ID {
                continue;
            }
            merged.insert(key, value);
        }
        if !stamps_update {
            merged.insert(
                fields::UPDATED_AT.to_string(),
                Value::String(format_timestamp(Utc::now())),
            );
        }
        schema.validate(&merged)?;

        conn.execute(
            &format!(
                "UPDATE {} SET doc = ?1, updated_at = ?2 WHERE _id = ?3",
                schema.table
            ),
            params![
                serde_json::to_string(&merged)?,
                timestamp_of(&merged, fields::UPDATED_AT),
                id,
            ],
        )?;
        Ok(true)
    }

    async fn count(&self, collection: &str) -> RepositoryResult<u64> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", schema.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> RepositoryResult<bool> {
        let schema = schema_for(collection)?;
        let conn = self.get_conn()?;

        let id = match select_one(&conn, schema, filter)? {
            Some(doc) => str_field(&doc, fields::ID).map(str::to_string),
            None => None,
        };
        match id {
            Some(id) => {
                let deleted = conn.execute(
                    &format!("DELETE FROM {} WHERE _id = ?1", schema.table),
                    params![id],
                )?;
                Ok(deleted > 0)
            }
            None => Ok(false),
        }
    }
}
