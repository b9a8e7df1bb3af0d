// ==========================================
// Appliance Registry - Entity transformer
// ==========================================
// Responsibility: raw sheet row → complete registry document
// Each entity is one static field table (field → aliases, kind,
// default) consumed by a single generic routine
// Rule: missing optional data never fails a row; only an
// unresolved key (or a required numeric) does
// ==========================================

use crate::domain::document::{fields, format_timestamp, Document};
use crate::domain::import::RawRow;
use crate::domain::types::{ApplianceType, AssignmentStatus, UserRole};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_normalizer::{
    coerce_bool, coerce_date, coerce_list, coerce_number, first_present,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

// ==========================================
// Field table types
// ==========================================

/// How a field's raw cell becomes a document value
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Identity field (or composite half); unresolved → row rejected
    Key,
    /// Text with a fixed default
    Text { default: &'static str },
    /// Text stored as null when absent
    OptionalText,
    /// yes/true → true
    Flag,
    /// Date; absent/unparseable → now, or null
    Date { default_now: bool },
    /// Leading-prefix float; absent → 0 unless required
    Number { required: bool },
    /// Comma-separated list, null when absent
    List,
    /// Restricted choice, normalized through the domain enum
    Choice {
        default: &'static str,
        normalize: fn(&str) -> String,
    },
}

#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
}

const fn field(name: &'static str, aliases: &'static [&'static str], kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        aliases,
        kind,
    }
}

const fn text(default: &'static str) -> FieldKind {
    FieldKind::Text { default }
}

const NO_EMAIL: &str = "noemail@example.com";
const NOT_PROVIDED: &str = "Not Provided";
const NOT_SPECIFIED: &str = "Not Specified";

// ==========================================
// Choice normalizers
// ==========================================

fn normalize_appliance_type(raw: &str) -> String {
    ApplianceType::parse_or_default(raw).to_string()
}

fn normalize_user_role(raw: &str) -> String {
    UserRole::parse_or_default(raw).to_string()
}

fn normalize_assignment_status(raw: &str) -> String {
    AssignmentStatus::parse_or_default(raw).to_string()
}

// ==========================================
// Field tables
// ==========================================

pub static APPLIANCE_FIELDS: &[FieldSpec] = &[
    field("applianceId", &["applianceId", "ApplianceID", "ID"], FieldKind::Key),
    field("manufacturer", &["manufacturer", "Manufacturer"], text("Unknown")),
    field("manufacturerAddress", &["manufacturerAddress", "Manufacturer Address"], text(NOT_PROVIDED)),
    field("manufacturerContactName", &["manufacturerContactName", "Contact Name"], text(NOT_PROVIDED)),
    field("manufacturerContactEmail", &["manufacturerContactEmail", "Contact Email"], text(NO_EMAIL)),
    field("manufacturerAlternateEmail", &["manufacturerAlternateEmail", "Alternate Email"], FieldKind::OptionalText),
    field("manufacturerPhone", &["manufacturerPhone", "Contact Phone"], text(NOT_PROVIDED)),
    field("modelName", &["modelName", "Model Name"], text("Unknown Model")),
    field("modelNumber", &["modelNumber", "Model Number"], text("N/A")),
    field(
        "applianceType",
        &["applianceType", "Appliance Type"],
        FieldKind::Choice {
            default: "Other",
            normalize: normalize_appliance_type,
        },
    ),
    field("isVariant", &["isVariant", "Is Variant"], FieldKind::Flag),
    field("existingAuthorisedAppliance", &["existingAuthorisedAppliance", "Existing Appliance"], FieldKind::OptionalText),
    field("nominalOutput", &["nominalOutput", "Nominal Output (kW)"], FieldKind::Number { required: false }),
    field("allowedFuels", &["allowedFuels", "Allowed Fuels"], text(NOT_SPECIFIED)),
    field("permittedFuels", &["permittedFuels", "Permitted Fuels"], FieldKind::List),
    field("instructionManualTitle", &["instructionManualTitle", "Manual Title"], text(NOT_PROVIDED)),
    field("instructionManualDate", &["instructionManualDate", "Manual Date"], FieldKind::Date { default_now: true }),
    field("instructionManualReference", &["instructionManualReference", "Manual Reference"], text("N/A")),
    field("submittedBy", &["submittedBy", "Submitted By"], text("Unknown")),
    field("approvedBy", &["approvedBy", "Approved By"], text("Unknown")),
    field("publishedDate", &["publishedDate", "Published Date"], FieldKind::Date { default_now: true }),
    field("additionalConditions", &["additionalConditions", "Additional Conditions"], FieldKind::OptionalText),
];

pub static FUEL_FIELDS: &[FieldSpec] = &[
    field("fuelId", &["fuelId", "FuelID", "ID"], FieldKind::Key),
    field("manufacturerName", &["manufacturerName", "Manufacturer Name"], text("Unknown")),
    field("manufacturerAddress", &["manufacturerAddress", "Manufacturer Address"], text(NOT_PROVIDED)),
    field("manufacturerContactName", &["manufacturerContactName", "Contact Name"], text(NOT_PROVIDED)),
    field("manufacturerContactEmail", &["manufacturerContactEmail", "Contact Email"], text(NO_EMAIL)),
    field("manufacturerAlternateEmail", &["manufacturerAlternateEmail", "Alternate Email"], FieldKind::OptionalText),
    field("manufacturerPhone", &["manufacturerPhone", "Contact Phone"], text(NOT_PROVIDED)),
    field("representativeName", &["representativeName", "Representative Name"], text(NOT_PROVIDED)),
    field("representativeEmail", &["representativeEmail", "Representative Email"], text(NO_EMAIL)),
    // "Has Complaints" is the older template heading
    field(
        "hasCustomerComplaints",
        &["hasCustomerComplaints", "Customer Complaints", "Has Complaints"],
        FieldKind::Flag,
    ),
    field("qualityControlSystem", &["qualityControlSystem", "Quality Control System"], text(NOT_SPECIFIED)),
    field("certificationScheme", &["certificationScheme", "Certification Scheme"], text("None")),
    field("fuelName", &["fuelName", "Fuel Name"], text("Unknown Fuel")),
    // left as written; the Fuels collection schema rejects anything outside Bagged/Loose/Bulk
    field("fuelBagging", &["fuelBagging", "Fuel Bagging"], text("Bagged")),
    field("isBaggedAtSource", &["isBaggedAtSource", "Bagged at Source"], FieldKind::Flag),
    field("fuelDescription", &["fuelDescription", "Fuel Description"], text("No description")),
    field("fuelWeight", &["fuelWeight", "Fuel Weight"], text(NOT_SPECIFIED)),
    field("fuelComposition", &["fuelComposition", "Fuel Composition"], text(NOT_SPECIFIED)),
    field(
        "sulphurContent",
        &["sulphurContent", "Sulphur Content", "Sulphur Content (%)"],
        FieldKind::Number { required: false },
    ),
    field("manufacturingProcess", &["manufacturingProcess", "Manufacturing Process"], text(NOT_SPECIFIED)),
    field("isRebrandedProduct", &["isRebrandedProduct", "Is Rebranded"], FieldKind::Flag),
    field("hasChangedFromOriginal", &["hasChangedFromOriginal", "Changed from Original"], FieldKind::Flag),
    field("brandNames", &["brandNames", "Brand Names"], FieldKind::List),
];

pub static USER_FIELDS: &[FieldSpec] = &[
    field("userId", &["userId", "UserID", "ID"], FieldKind::Key),
    field("firstName", &["firstName", "First Name"], text("Unknown")),
    field("lastName", &["lastName", "Last Name"], text("User")),
    field("email", &["email", "Email"], text(NO_EMAIL)),
    field("phone", &["phone", "Phone"], FieldKind::OptionalText),
    field(
        "role",
        &["role", "Role"],
        FieldKind::Choice {
            default: "user",
            normalize: normalize_user_role,
        },
    ),
    field("organization", &["organization", "Organization"], FieldKind::OptionalText),
    field("address", &["address", "Address"], FieldKind::OptionalText),
    field("city", &["city", "City"], FieldKind::OptionalText),
    field("postcode", &["postcode", "Postcode"], FieldKind::OptionalText),
    field("isActive", &["isActive", "Is Active"], FieldKind::Flag),
    field("registrationDate", &["registrationDate", "Registration Date"], FieldKind::Date { default_now: false }),
];

const ASSIGNMENT_STATUS: FieldKind = FieldKind::Choice {
    default: "active",
    normalize: normalize_assignment_status,
};

pub static USER_APPLIANCE_FIELDS: &[FieldSpec] = &[
    field("userId", &["userId", "UserID", "User ID"], FieldKind::Key),
    field("applianceId", &["applianceId", "ApplianceID", "Appliance ID"], FieldKind::Key),
    field("assignedDate", &["assignedDate", "Assigned Date"], FieldKind::Date { default_now: true }),
    field("status", &["status", "Status"], ASSIGNMENT_STATUS),
    field("notes", &["notes", "Notes"], FieldKind::OptionalText),
];

pub static USER_FUEL_FIELDS: &[FieldSpec] = &[
    field("userId", &["userId", "UserID", "User ID"], FieldKind::Key),
    field("fuelId", &["fuelId", "FuelID", "Fuel ID"], FieldKind::Key),
    field("assignedDate", &["assignedDate", "Assigned Date"], FieldKind::Date { default_now: true }),
    field("status", &["status", "Status"], ASSIGNMENT_STATUS),
    field("notes", &["notes", "Notes"], FieldKind::OptionalText),
];

// ==========================================
// Generic transform
// ==========================================

/// Builds a document from `row` following `table`
///
/// Both audit timestamps are stamped with `now`; the reconciler
/// drops `createdAt` when the record already exists.
pub fn transform_row(table: &[FieldSpec], row: &RawRow, now: DateTime<Utc>) -> ImportResult<Document> {
    let mut doc = Document::new();

    for spec in table {
        let raw = first_present(row, spec.aliases);
        let value = match spec.kind {
            FieldKind::Key => {
                let key = raw.ok_or_else(|| ImportError::missing(spec.name))?;
                Value::String(key.to_string())
            }
            FieldKind::Text { default } => Value::String(raw.unwrap_or(default).to_string()),
            FieldKind::OptionalText => raw.map_or(Value::Null, |v| Value::String(v.to_string())),
            FieldKind::Flag => Value::Bool(coerce_bool(raw)),
            FieldKind::Date { default_now } => {
                let date = coerce_date(raw).or(if default_now { Some(now) } else { None });
                date.map_or(Value::Null, |d| Value::String(format_timestamp(d)))
            }
            FieldKind::Number { required } => {
                let number = coerce_number(spec.name, raw, required)?;
                json!(number)
            }
            FieldKind::List => coerce_list(raw).map_or(Value::Null, |items| json!(items)),
            FieldKind::Choice { default, normalize } => {
                Value::String(normalize(raw.unwrap_or(default)))
            }
        };
        doc.insert(spec.name.to_string(), value);
    }

    let stamp = format_timestamp(now);
    doc.insert(fields::CREATED_AT.to_string(), Value::String(stamp.clone()));
    doc.insert(fields::UPDATED_AT.to_string(), Value::String(stamp));
    Ok(doc)
}
