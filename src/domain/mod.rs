// ==========================================
// Appliance Registry - Domain layer
// ==========================================
// Responsibility: registry records, restricted-choice enums,
// the document model and the import pipeline model
// Rule: no storage access, no spreadsheet access
// ==========================================

pub mod appliance;
pub mod assignment;
pub mod document;
pub mod fuel;
pub mod import;
pub mod types;
pub mod user;

// Re-exports
pub use appliance::Appliance;
pub use assignment::{UserAppliance, UserFuel};
pub use document::{fields, format_timestamp, from_document, str_field, Document, Filter};
pub use fuel::Fuel;
pub use import::{EntityRequest, ImportSummary, RawRow, RowError, SheetRow};
pub use types::{ApplianceType, AssignmentStatus, FuelBagging, UserRole};
pub use user::User;
