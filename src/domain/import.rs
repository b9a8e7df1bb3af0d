// ==========================================
// Appliance Registry - Import pipeline model
// ==========================================
// Sheet rows in, per-entity summaries out
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw row: header → stringified cell (None = empty cell)
pub type RawRow = HashMap<String, Option<String>>;

// ==========================================
// SheetRow - one data row of a sheet
// ==========================================
// row_number is the 1-based sheet row (header = row 1)
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub row_number: usize,
    pub values: RawRow,
}

impl SheetRow {
    pub fn new(row_number: usize, values: RawRow) -> Self {
        Self { row_number, values }
    }

    /// Builds a row from `(header, value)` pairs; empty strings become None
    pub fn from_pairs(row_number: usize, pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(k, v)| {
                let value = if v.is_empty() { None } else { Some(v.to_string()) };
                (k.to_string(), value)
            })
            .collect();
        Self { row_number, values }
    }
}

// ==========================================
// EntityRequest - one entry of a batch import request
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRequest {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
}

impl EntityRequest {
    pub fn new(entity_type: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            sheet_name: None,
        }
    }

    pub fn with_sheet(entity_type: &str, sheet_name: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            sheet_name: Some(sheet_name.to_string()),
        }
    }
}

// ==========================================
// RowError - row-level failure
// ==========================================
// row is None for entity-level failures (unknown type, missing sheet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub error: String,
}

impl RowError {
    pub fn at_row(row: usize, error: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            error: error.into(),
        }
    }

    pub fn entity_level(error: impl Into<String>) -> Self {
        Self {
            row: None,
            error: error.into(),
        }
    }
}

// ==========================================
// ImportSummary - per-entity import accounting
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub entity: String,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn empty(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            inserted: 0,
            updated: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Zero-count result carrying a single entity-level error
    pub fn failed(entity: &str, error: impl Into<String>) -> Self {
        let mut summary = Self::empty(entity);
        summary.errors.push(RowError::entity_level(error));
        summary
    }

    /// Records a skipped row
    pub fn skip(&mut self, row: usize, error: impl Into<String>) {
        self.skipped += 1;
        self.errors.push(RowError::at_row(row, error));
    }

    pub fn processed(&self) -> usize {
        self.inserted + self.updated + self.skipped
    }
}
