// ==========================================
// Test helpers
// ==========================================
// Temp databases, CSV fixtures and sheet rows shared by the
// integration tests
// ==========================================

#![allow(dead_code)]

use appliance_registry::domain::SheetRow;
use appliance_registry::repository::SqliteDocumentStore;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Creates a temporary database file with the registry schema
///
/// # Returns
/// - NamedTempFile: keep it alive for the duration of the test
/// - SqliteDocumentStore: store over that file
/// - String: database file path
pub fn create_test_store() -> Result<(NamedTempFile, SqliteDocumentStore, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not UTF-8")?
        .to_string();
    let store = SqliteDocumentStore::open(&db_path)?;
    Ok((temp_file, store, db_path))
}

/// Writes `rows` (header first) as `<dir>/<name>`
pub fn write_csv(dir: &Path, name: &str, rows: &[&[&str]]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.write_record(*row)?;
    }
    writer.flush()?;
    Ok(path)
}

/// Spreadsheet row numbered as it would be read (header is row 1)
pub fn row(row_number: usize, pairs: &[(&str, &str)]) -> SheetRow {
    SheetRow::from_pairs(row_number, pairs)
}

/// Multi-sheet workbook checked into tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
