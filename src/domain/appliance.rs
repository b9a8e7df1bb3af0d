// ==========================================
// Appliance Registry - Appliance record
// ==========================================
// Collection: Appliances
// Identity: applianceId (unique)
// ==========================================

use crate::domain::types::ApplianceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Appliance - authorised heating appliance
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    // Store-assigned document id
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // ===== Identity =====
    pub appliance_id: String,

    // ===== Manufacturer =====
    pub manufacturer: String,
    pub manufacturer_address: String,
    pub manufacturer_contact_name: String,
    pub manufacturer_contact_email: String,
    pub manufacturer_alternate_email: Option<String>,
    pub manufacturer_phone: String,

    // ===== Model =====
    pub model_name: String,
    pub model_number: String,
    pub appliance_type: ApplianceType,
    pub is_variant: bool,
    pub existing_authorised_appliance: Option<String>,
    pub nominal_output: f64, // kW
    pub allowed_fuels: String,
    pub permitted_fuels: Option<Vec<String>>, // Fuel ids

    // ===== Instruction manual =====
    pub instruction_manual_title: String,
    pub instruction_manual_date: DateTime<Utc>,
    pub instruction_manual_reference: String,

    // ===== Submission / approval =====
    pub submitted_by: String,
    pub approved_by: String,
    pub published_date: DateTime<Utc>,
    pub additional_conditions: Option<String>,

    // ===== Audit =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
