// ==========================================
// Appliance Registry - Entity registry
// ==========================================
// EntityKind → collection, default sheet, identity, field table,
// sample row. Dispatch is an exhaustive match per kind
// ==========================================

use crate::domain::document::Document;
use crate::domain::import::RawRow;
use crate::importer::entity_transformer::{
    transform_row, FieldSpec, APPLIANCE_FIELDS, FUEL_FIELDS, USER_APPLIANCE_FIELDS,
    USER_FIELDS, USER_FUEL_FIELDS,
};
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Identity rule of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    /// One unique field
    Single(&'static str),
    /// userId plus whichever of applianceId / fuelId the document carries
    Composite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Appliances,
    Fuels,
    Users,
    UserAppliances,
    UserFuels,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Appliances,
        EntityKind::Fuels,
        EntityKind::Users,
        EntityKind::UserAppliances,
        EntityKind::UserFuels,
    ];

    /// Batch request identifier (`appliances`, `userFuels`, ...)
    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name {
            "appliances" => Some(EntityKind::Appliances),
            "fuels" => Some(EntityKind::Fuels),
            "users" => Some(EntityKind::Users),
            "userAppliances" => Some(EntityKind::UserAppliances),
            "userFuels" => Some(EntityKind::UserFuels),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            EntityKind::Appliances => "appliances",
            EntityKind::Fuels => "fuels",
            EntityKind::Users => "users",
            EntityKind::UserAppliances => "userAppliances",
            EntityKind::UserFuels => "userFuels",
        }
    }

    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Appliances => "Appliances",
            EntityKind::Fuels => "Fuels",
            EntityKind::Users => "Users",
            EntityKind::UserAppliances => "UserAppliances",
            EntityKind::UserFuels => "UserFuels",
        }
    }

    /// Sheets are named after their collection unless the request says otherwise
    pub fn default_sheet_name(&self) -> &'static str {
        self.collection_name()
    }

    pub fn key_spec(&self) -> KeySpec {
        match self {
            EntityKind::Appliances => KeySpec::Single("applianceId"),
            EntityKind::Fuels => KeySpec::Single("fuelId"),
            EntityKind::Users => KeySpec::Single("userId"),
            EntityKind::UserAppliances | EntityKind::UserFuels => KeySpec::Composite,
        }
    }

    /// Text fields matched by free-text search; link collections have none
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Appliances => &["manufacturer", "modelName", "applianceType"],
            EntityKind::Fuels => &["fuelName", "manufacturerName"],
            EntityKind::Users => &["firstName", "lastName", "email"],
            EntityKind::UserAppliances | EntityKind::UserFuels => &[],
        }
    }

    pub fn field_table(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Appliances => APPLIANCE_FIELDS,
            EntityKind::Fuels => FUEL_FIELDS,
            EntityKind::Users => USER_FIELDS,
            EntityKind::UserAppliances => USER_APPLIANCE_FIELDS,
            EntityKind::UserFuels => USER_FUEL_FIELDS,
        }
    }

    pub fn transform(&self, row: &RawRow) -> ImportResult<Document> {
        self.transform_at(row, Utc::now())
    }

    pub fn transform_at(&self, row: &RawRow, now: DateTime<Utc>) -> ImportResult<Document> {
        transform_row(self.field_table(), row, now)
    }

    /// Example row for templates (header → value, template column order)
    pub fn sample_row(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntityKind::Appliances => &[
                ("applianceId", "APP001"),
                ("manufacturer", "Stoves LTD"),
                ("manufacturerAddress", "24 Bowerfield Lane Newcastle NE638BO"),
                ("manufacturerContactName", "Joe Bloggs"),
                ("manufacturerContactEmail", "Joe.bloggs@gmail.com"),
                ("manufacturerAlternateEmail", "Joe.bloggs2@gmail.com"),
                ("manufacturerPhone", "7846638263"),
                ("modelName", "Hot Stove 89"),
                ("modelNumber", "AHS231"),
                ("applianceType", "Stove"),
                ("isVariant", "Yes"),
                ("existingAuthorisedAppliance", "Hot Stove 88"),
                ("nominalOutput", "12"),
                ("allowedFuels", "Wood Logs, Wood Pellets"),
                ("permittedFuels", "FUEL001, FUEL002"),
                ("instructionManualTitle", "Stove manual instructions"),
                ("instructionManualDate", "01/07/2024"),
                ("instructionManualReference", "Issue 08"),
                (
                    "additionalConditions",
                    "Must be fitted with the supplied secondary air control limiters",
                ),
                ("submittedBy", "Phil Mitchell"),
                ("approvedBy", "Bruce Lee"),
                ("publishedDate", "04/02/2025"),
            ],
            EntityKind::Fuels => &[
                ("fuelId", "FUEL001"),
                ("manufacturerName", "Fuels Company Ltd"),
                ("manufacturerAddress", "24 Bowerfield Lane Newcastle NE638BO"),
                ("manufacturerContactName", "Joe Bloggs"),
                ("manufacturerContactEmail", "Joe.bloggs@gmail.com"),
                ("manufacturerAlternateEmail", "Joe.bloggs2@gmail.com"),
                ("manufacturerPhone", "7846638263"),
                ("representativeName", "Simon Gates"),
                ("representativeEmail", "Simon.Gates@FuelsLTD.com"),
                ("hasCustomerComplaints", "No"),
                ("qualityControlSystem", "ISO 9001 certified"),
                (
                    "certificationScheme",
                    "Fuel authorisation under the Clean Air Act 1993",
                ),
                ("fuelName", "Eco Briquettes Premium"),
                ("fuelBagging", "Bagged"),
                ("isBaggedAtSource", "Yes"),
                (
                    "fuelDescription",
                    "Pillow-shaped briquettes with single line indentation",
                ),
                ("fuelWeight", "Average weight of 125 to 135 grams per briquette"),
                ("fuelComposition", "Anthracite fines (60% to 80%)"),
                ("sulphurContent", "20"),
                (
                    "manufacturingProcess",
                    "Roll pressing and heat treatment at 300 degrees celsius",
                ),
                ("isRebrandedProduct", "No"),
                ("hasChangedFromOriginal", "No"),
                ("brandNames", "Fuel brand 1, Fuel brand 2"),
            ],
            EntityKind::Users => &[
                ("userId", "USER001"),
                ("firstName", "John"),
                ("lastName", "Smith"),
                ("email", "john.smith@example.com"),
                ("phone", "07700900123"),
                ("role", "admin"),
                ("organization", "DEFRA"),
                ("address", "123 Main Street"),
                ("city", "London"),
                ("postcode", "SW1A 1AA"),
                ("isActive", "Yes"),
                ("registrationDate", "01/01/2025"),
            ],
            EntityKind::UserAppliances => &[
                ("userId", "USER001"),
                ("applianceId", "APP001"),
                ("assignedDate", "15/01/2025"),
                ("status", "active"),
                ("notes", "Primary heating appliance"),
            ],
            EntityKind::UserFuels => &[
                ("userId", "USER001"),
                ("fuelId", "FUEL001"),
                ("assignedDate", "15/01/2025"),
                ("status", "active"),
                ("notes", "Preferred fuel type"),
            ],
        }
    }
}

impl FromStr for EntityKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::parse(s).ok_or_else(|| ImportError::UnknownEntityType(s.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
