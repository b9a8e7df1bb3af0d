// ==========================================
// Appliance Registry - Domain enums
// ==========================================
// Restricted-choice fields of the registry records
// Rule: unrecognized input falls back to a fixed default
// (fuel bagging excepted: only the storage schema constrains it)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Appliance type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplianceType {
    Stove,
    Boiler,
    Fire,
    Heater,
    Other,
}

impl ApplianceType {
    pub const ALL: [&'static str; 5] = ["Stove", "Boiler", "Fire", "Heater", "Other"];

    /// Exact (case-sensitive) match; anything else becomes `Other`
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "Stove" => ApplianceType::Stove,
            "Boiler" => ApplianceType::Boiler,
            "Fire" => ApplianceType::Fire,
            "Heater" => ApplianceType::Heater,
            _ => ApplianceType::Other,
        }
    }
}

impl fmt::Display for ApplianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplianceType::Stove => write!(f, "Stove"),
            ApplianceType::Boiler => write!(f, "Boiler"),
            ApplianceType::Fire => write!(f, "Fire"),
            ApplianceType::Heater => write!(f, "Heater"),
            ApplianceType::Other => write!(f, "Other"),
        }
    }
}

// ==========================================
// Fuel bagging
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelBagging {
    Bagged,
    Loose,
    Bulk,
}

impl FuelBagging {
    pub const ALL: [&'static str; 3] = ["Bagged", "Loose", "Bulk"];
}

impl fmt::Display for FuelBagging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelBagging::Bagged => write!(f, "Bagged"),
            FuelBagging::Loose => write!(f, "Loose"),
            FuelBagging::Bulk => write!(f, "Bulk"),
        }
    }
}

// ==========================================
// User role
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Manager,
    Viewer,
}

impl UserRole {
    pub const ALL: [&'static str; 4] = ["admin", "user", "manager", "viewer"];

    /// Case-insensitive match; anything else becomes `user`
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "manager" => UserRole::Manager,
            "viewer" => UserRole::Viewer,
            _ => UserRole::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Viewer => write!(f, "viewer"),
        }
    }
}

// ==========================================
// Assignment status (user ↔ appliance / fuel links)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Inactive,
    Pending,
    Expired,
}

impl AssignmentStatus {
    pub const ALL: [&'static str; 4] = ["active", "inactive", "pending", "expired"];

    /// Case-insensitive match; anything else becomes `active`
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "inactive" => AssignmentStatus::Inactive,
            "pending" => AssignmentStatus::Pending,
            "expired" => AssignmentStatus::Expired,
            _ => AssignmentStatus::Active,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "active"),
            AssignmentStatus::Inactive => write!(f, "inactive"),
            AssignmentStatus::Pending => write!(f, "pending"),
            AssignmentStatus::Expired => write!(f, "expired"),
        }
    }
}
