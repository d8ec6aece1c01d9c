//! Store Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Store ID type
pub type StoreId = RecordId;

/// Store model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<StoreId>,
    pub name: String,
    pub description: Option<String>,
    /// Owning vendor account
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    /// Payee VPA used in payment links, e.g. "canteen@upi"
    pub upi_id: String,
    /// Payee display name used in payment links
    pub upi_payee_name: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    pub description: Option<String>,
    pub upi_id: String,
    pub upi_payee_name: Option<String>,
}

/// Update store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
