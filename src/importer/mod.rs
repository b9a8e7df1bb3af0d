// ==========================================
// Appliance Registry - Import layer
// ==========================================
// Responsibility: spreadsheet rows → registry documents → store
// Flow: Workbook → SheetRow → EntityKind::transform → ImportReconciler
// ==========================================

pub mod batch_importer;
pub mod entity_registry;
pub mod entity_transformer;
pub mod error;
pub mod field_normalizer;
pub mod reconciler;
pub mod sheet_reader;
pub mod staged_upload;
pub mod template_writer;

pub use batch_importer::{import_batch, parse_requests, BatchImporter};
pub use entity_registry::{EntityKind, KeySpec};
pub use error::{ImportError, ImportResult};
pub use reconciler::{identity_filter, ImportReconciler, UpsertOutcome};
pub use sheet_reader::{CsvWorkbook, ExcelWorkbook, MemoryWorkbook, Workbook, WorkbookSource};
pub use staged_upload::StagedUpload;
pub use template_writer::{write_template, write_templates};
