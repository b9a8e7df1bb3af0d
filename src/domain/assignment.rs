// ==========================================
// Appliance Registry - User assignments
// ==========================================
// Collections: UserAppliances / UserFuels
// Identity: composite (userId, applianceId) / (userId, fuelId)
// ==========================================

use crate::domain::types::AssignmentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// UserAppliance - user ↔ appliance link
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAppliance {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub user_id: String,
    pub appliance_id: String,
    pub assigned_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// UserFuel - user ↔ fuel link
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFuel {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub user_id: String,
    pub fuel_id: String,
    pub assigned_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
