// ==========================================
// Appliance Registry - Fuel record
// ==========================================
// Collection: Fuels
// Identity: fuelId (unique)
// ==========================================

use crate::domain::types::FuelBagging;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fuel {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub fuel_id: String,

    // ===== Manufacturer & representative =====
    pub manufacturer_name: String,
    pub manufacturer_address: String,
    pub manufacturer_contact_name: String,
    pub manufacturer_contact_email: String,
    pub manufacturer_alternate_email: Option<String>,
    pub manufacturer_phone: String,
    pub representative_name: String,
    pub representative_email: String,

    // ===== Quality =====
    pub has_customer_complaints: bool,
    pub quality_control_system: String,
    pub certification_scheme: String,

    // ===== Product =====
    pub fuel_name: String,
    pub fuel_bagging: FuelBagging,
    pub is_bagged_at_source: bool,
    pub fuel_description: String,
    pub fuel_weight: String,
    pub fuel_composition: String,
    pub sulphur_content: f64, // percent, 0-100
    pub manufacturing_process: String,
    pub is_rebranded_product: bool,
    pub has_changed_from_original: bool,
    pub brand_names: Option<Vec<String>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
