//! Menu Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item ID type
pub type MenuItemId = RecordId;

/// Menu item model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_available: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub store_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
