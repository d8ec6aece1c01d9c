//! Order Repository
//!
//! Every mutation is a single `UPDATE ... RETURN AFTER` statement scoped to
//! one order record. There is no version token: two racing transitions are
//! resolved by last-write-wins, matching the documented concurrency model.

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{Order, OrderItemLine};
use serde::Serialize;
use shared::{OrderStatus, PaymentStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

/// Full record written at creation (the `Order` model never serializes the
/// OTP column, so inserts and OTP writes go through explicit shapes).
#[derive(Debug, Serialize)]
struct OrderRecord {
    order_number: String,
    user: String,
    store: String,
    items: Vec<OrderItemLine>,
    total_amount: f64,
    payment_status: PaymentStatus,
    order_status: OrderStatus,
    otp: Option<String>,
    otp_expires_at: Option<i64>,
    is_otp_verified: bool,
    transaction_id: Option<String>,
    special_instructions: Option<String>,
    created_at: i64,
    updated_at: i64,
}

/// Arguments for creating an order
#[derive(Debug)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: String,
    pub store_id: String,
    pub items: Vec<OrderItemLine>,
    pub total_amount: f64,
    pub special_instructions: Option<String>,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order in `placed`/`pending` state.
    ///
    /// The unique index on `order_number` turns a collision into
    /// `Duplicate`, surfaced to the caller as a generic conflict.
    pub async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let now = shared::util::now_millis();
        let record = OrderRecord {
            order_number: data.order_number,
            user: to_record_id("user", &data.user_id).to_string(),
            store: to_record_id("store", &data.store_id).to_string(),
            items: data.items,
            total_amount: data.total_amount,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Placed,
            otp: None,
            otp_expires_at: None,
            is_otp_verified: false,
            transaction_id: None,
            special_instructions: data.special_instructions,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = to_record_id(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Orders placed by a customer, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user = to_record_id("user", user_id).to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders across a set of stores, newest first
    pub async fn find_by_stores(&self, store_ids: Vec<String>) -> RepoResult<Vec<Order>> {
        let stores: Vec<String> = store_ids
            .into_iter()
            .map(|s| to_record_id("store", &s).to_string())
            .collect();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE store IN $stores ORDER BY created_at DESC")
            .bind(("stores", stores))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Apply a status change in one write. The `ready` transition passes the
    /// freshly minted OTP so code, expiry, and status land atomically.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        otp: Option<(String, i64)>,
    ) -> RepoResult<Order> {
        let record_id = to_record_id(ORDER_TABLE, id);
        let now = shared::util::now_millis();

        let mut result = match otp {
            Some((code, expires_at)) => {
                self.base
                    .db()
                    .query(
                        "UPDATE $id SET order_status = $status, otp = $otp, \
                         otp_expires_at = $otp_expires_at, is_otp_verified = false, \
                         updated_at = $now RETURN AFTER",
                    )
                    .bind(("id", record_id))
                    .bind(("status", status))
                    .bind(("otp", code))
                    .bind(("otp_expires_at", expires_at))
                    .bind(("now", now))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "UPDATE $id SET order_status = $status, updated_at = $now RETURN AFTER",
                    )
                    .bind(("id", record_id))
                    .bind(("status", status))
                    .bind(("now", now))
                    .await?
            }
        };

        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Apply a payment status change; `advance_to_accepted` folds the
    /// implicit placed → accepted move into the same write.
    pub async fn update_payment(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        transaction_id: Option<String>,
        advance_to_accepted: bool,
    ) -> RepoResult<Order> {
        let record_id = to_record_id(ORDER_TABLE, id);
        let now = shared::util::now_millis();

        let mut set_parts = vec!["payment_status = $payment_status", "updated_at = $now"];
        if transaction_id.is_some() {
            set_parts.push("transaction_id = $transaction_id");
        }
        if advance_to_accepted {
            set_parts.push("order_status = $order_status");
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("id", record_id))
            .bind(("payment_status", payment_status))
            .bind(("now", now));
        if let Some(tx) = transaction_id {
            query = query.bind(("transaction_id", tx));
        }
        if advance_to_accepted {
            query = query.bind(("order_status", OrderStatus::Accepted));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Mark the OTP verified and the order picked up in one write.
    pub async fn confirm_pickup(&self, id: &str) -> RepoResult<Order> {
        let record_id = to_record_id(ORDER_TABLE, id);
        let now = shared::util::now_millis();

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET is_otp_verified = true, order_status = $status, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("id", record_id))
            .bind(("status", OrderStatus::PickedUp))
            .bind(("now", now))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
