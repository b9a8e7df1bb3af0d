// ==========================================
// Appliance Registry - Collection schemas
// ==========================================
// Storage-level validation applied on every insert/update:
// required fields, restricted choices, numeric ranges.
// Uniqueness is enforced by the per-collection indexes
// (see db::init_schema)
// ==========================================

use crate::domain::document::Document;
use crate::domain::types::{ApplianceType, AssignmentStatus, FuelBagging, UserRole};
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde_json::Value;

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    pub field: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug)]
pub struct CollectionSchema {
    pub collection: &'static str,
    pub table: &'static str,
    pub required: &'static [&'static str],
    pub choices: &'static [(&'static str, &'static [&'static str])],
    pub ranges: &'static [RangeRule],
    /// Unique key sets, one index each
    pub unique: &'static [&'static [&'static str]],
}

pub static SCHEMAS: [CollectionSchema; 5] = [
    CollectionSchema {
        collection: "Appliances",
        table: "appliances",
        required: &[
            "applianceId",
            "manufacturer",
            "manufacturerAddress",
            "manufacturerContactName",
            "manufacturerContactEmail",
            "manufacturerPhone",
            "modelName",
            "modelNumber",
            "applianceType",
            "isVariant",
            "nominalOutput",
            "allowedFuels",
            "instructionManualTitle",
            "instructionManualDate",
            "instructionManualReference",
            "submittedBy",
            "approvedBy",
            "publishedDate",
        ],
        choices: &[("applianceType", &ApplianceType::ALL)],
        ranges: &[RangeRule {
            field: "nominalOutput",
            min: Some(0.0),
            max: None,
        }],
        unique: &[&["applianceId"]],
    },
    CollectionSchema {
        collection: "Fuels",
        table: "fuels",
        required: &[
            "fuelId",
            "manufacturerName",
            "manufacturerAddress",
            "manufacturerContactName",
            "manufacturerContactEmail",
            "manufacturerPhone",
            "representativeName",
            "representativeEmail",
            "hasCustomerComplaints",
            "qualityControlSystem",
            "certificationScheme",
            "fuelName",
            "fuelBagging",
            "isBaggedAtSource",
            "fuelDescription",
            "fuelWeight",
            "fuelComposition",
            "sulphurContent",
            "manufacturingProcess",
            "isRebrandedProduct",
            "hasChangedFromOriginal",
        ],
        choices: &[("fuelBagging", &FuelBagging::ALL)],
        ranges: &[RangeRule {
            field: "sulphurContent",
            min: Some(0.0),
            max: Some(100.0),
        }],
        unique: &[&["fuelId"]],
    },
    CollectionSchema {
        collection: "Users",
        table: "users",
        required: &["userId", "firstName", "lastName", "email", "role"],
        choices: &[("role", &UserRole::ALL)],
        ranges: &[],
        unique: &[&["userId"], &["email"]],
    },
    CollectionSchema {
        collection: "UserAppliances",
        table: "user_appliances",
        required: &["userId", "applianceId"],
        choices: &[("status", &AssignmentStatus::ALL)],
        ranges: &[],
        unique: &[&["userId", "applianceId"]],
    },
    CollectionSchema {
        collection: "UserFuels",
        table: "user_fuels",
        required: &["userId", "fuelId"],
        choices: &[("status", &AssignmentStatus::ALL)],
        ranges: &[],
        unique: &[&["userId", "fuelId"]],
    },
];

/// Looks up the schema of a collection
pub fn schema_for(collection: &str) -> RepositoryResult<&'static CollectionSchema> {
    SCHEMAS
        .iter()
        .find(|s| s.collection == collection)
        .ok_or_else(|| RepositoryError::UnknownCollection(collection.to_string()))
}

impl CollectionSchema {
    pub fn validate(&self, doc: &Document) -> RepositoryResult<()> {
        for field in self.required {
            match doc.get(*field) {
                None | Some(Value::Null) => {
                    return Err(self.violation(format!("missing required field {}", field)))
                }
                Some(Value::String(s)) if s.trim().is_empty() => {
                    return Err(self.violation(format!("missing required field {}", field)))
                }
                _ => {}
            }
        }

        for (field, allowed) in self.choices {
            match doc.get(*field) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
                Some(_) => {
                    return Err(self.violation(format!(
                        "{} must be one of {}",
                        field,
                        allowed.join(", ")
                    )))
                }
            }
        }

        for rule in self.ranges {
            let value = match doc.get(rule.field) {
                None | Some(Value::Null) => continue,
                Some(v) => v
                    .as_f64()
                    .ok_or_else(|| self.violation(format!("{} must be a number", rule.field)))?,
            };
            let below = rule.min.map_or(false, |min| value < min);
            let above = rule.max.map_or(false, |max| value > max);
            if below || above {
                return Err(self.violation(format!(
                    "{} must be {} (got {})",
                    rule.field,
                    rule.describe(),
                    value
                )));
            }
        }

        Ok(())
    }

    fn violation(&self, message: String) -> RepositoryError {
        RepositoryError::SchemaViolation {
            collection: self.collection.to_string(),
            message,
        }
    }
}

impl RangeRule {
    fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("between {} and {}", min, max),
            (Some(min), None) => format!("at least {}", min),
            (None, Some(max)) => format!("at most {}", max),
            (None, None) => "a number".to_string(),
        }
    }
}
