//! Order Model
//!
//! Orders snapshot their items at creation time; later menu price edits
//! never touch a placed order. The OTP column is never serialized back to
//! API callers: the `ready` transition response and the customer
//! notification are the only channels that carry the plaintext code.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{OrderStatus, PaymentStatus};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// One snapshotted order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemLine {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    /// price × quantity, rounded to 2 decimals
    pub total: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Human-readable order number, unique at the storage layer
    pub order_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub items: Vec<OrderItemLine>,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    #[serde(default, skip_serializing)]
    pub otp: Option<String>,
    #[serde(default)]
    pub otp_expires_at: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_otp_verified: bool,
    pub transaction_id: Option<String>,
    pub special_instructions: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub menu_item_id: String,
    /// Positive integer; missing or invalid values fall back to 1
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub store_id: String,
    pub items: Vec<CartItemRequest>,
    pub special_instructions: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

/// Payment status payload. The status arrives as a free string so an
/// unknown value maps to the invalid-state error, not a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub payment_status: String,
    pub transaction_id: Option<String>,
}

/// OTP verification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Lightweight projection for client polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPollStatus {
    pub id: String,
    pub order_number: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub updated_at: i64,
}

impl Order {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    pub fn poll_status(&self) -> OrderPollStatus {
        OrderPollStatus {
            id: self.id_string(),
            order_number: self.order_number.clone(),
            payment_status: self.payment_status,
            order_status: self.order_status,
            updated_at: self.updated_at,
        }
    }
}
