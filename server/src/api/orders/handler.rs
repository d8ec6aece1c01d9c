//! Order API Handlers
//!
//! The whole order lifecycle: intake, status transitions, payment status,
//! OTP verification, and the polling projection. Each mutation is one
//! repository write; notifications are queued after the write and never
//! affect the response.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use shared::{ApiResponse, OrderStatus, PaymentStatus};

use crate::auth::{Action, CurrentUser, ensure};
use crate::core::ServerState;
use crate::db::models::{
    Order, OrderCreateRequest, OrderItemLine, OrderPollStatus, OrderStatusRequest,
    PaymentStatusRequest, VerifyOtpRequest,
};
use crate::db::repository::{
    MenuItemRepository, OrderRepository, RepoError, StoreRepository, UserRepository,
    order::NewOrder,
};
use crate::notify::Notification;
use crate::orders::{number, otp, pricing};
use crate::payment::upi;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, created, ok};

/// Created-order payload: the order plus everything the client needs to
/// start a UPI payment.
#[derive(Debug, Serialize)]
pub struct OrderCreatedResponse {
    pub order: Order,
    pub payment: upi::PaymentInfo,
}

/// Status-transition payload; `otp` is present only when the transition
/// was to `ready`.
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Look up the customer's email for a notification. Returns `None` (and
/// logs) on any failure; notifications never break the request.
async fn customer_email(state: &ServerState, order: &Order) -> Option<String> {
    let repo = UserRepository::new(state.db());
    match repo.find_by_id(&order.user.to_string()).await {
        Ok(Some(user)) => Some(user.email),
        Ok(None) => {
            tracing::warn!(order = %order.order_number, "Customer record missing for notification");
            None
        }
        Err(e) => {
            tracing::warn!(order = %order.order_number, "Failed to load customer for notification: {e}");
            None
        }
    }
}

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderCreatedResponse>>)> {
    if payload.items.is_empty() {
        return Err(AppError::validation("items must not be empty"));
    }
    validate_optional_text(&payload.special_instructions, "special_instructions", MAX_NOTE_LEN)?;

    let store_repo = StoreRepository::new(state.db());
    let store = store_repo
        .find_by_id(&payload.store_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {} not found", payload.store_id)))?;
    if !store.is_active {
        return Err(AppError::invalid_state(format!(
            "Store {} is not accepting orders",
            store.name
        )));
    }
    let store_id = store.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    // Snapshot each requested item against the store's current menu
    let menu_repo = MenuItemRepository::new(state.db());
    let mut lines: Vec<OrderItemLine> = Vec::with_capacity(payload.items.len());
    for cart_item in &payload.items {
        let item = menu_repo
            .find_by_id(&cart_item.menu_item_id)
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!("Menu item {} not found", cart_item.menu_item_id))
            })?;

        if item.store.to_string() != store_id {
            return Err(AppError::invalid_state(format!(
                "Item {} does not belong to this store",
                item.name
            )));
        }
        if !item.is_available {
            return Err(AppError::invalid_state(format!(
                "Item {} is currently unavailable",
                item.name
            )));
        }

        let quantity = pricing::normalize_quantity(cart_item.quantity.as_ref());
        let total = pricing::line_total(item.price, quantity);
        lines.push(OrderItemLine {
            menu_item: item.id.clone().ok_or_else(|| {
                AppError::internal("Menu item record has no id")
            })?,
            name: item.name,
            price: item.price,
            quantity,
            total,
        });
    }

    let line_totals: Vec<f64> = lines.iter().map(|l| l.total).collect();
    let total_amount = pricing::order_total(&line_totals);
    let order_number = number::generate(chrono::Utc::now())?;

    let order_repo = OrderRepository::new(state.db());
    let order = order_repo
        .create(NewOrder {
            order_number,
            user_id: user.id.clone(),
            store_id: store_id.clone(),
            items: lines,
            total_amount,
            special_instructions: payload.special_instructions,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::conflict("Order number conflict, please retry"),
            other => other.into(),
        })?;

    tracing::info!(
        order = %order.order_number,
        user = %user.id,
        store = %store_id,
        total = order.total_amount,
        "Order placed"
    );

    if let Some(email) = customer_email(&state, &order).await {
        state.notifier.publish(Notification::OrderPlaced {
            email,
            order_number: order.order_number.clone(),
            total_amount: order.total_amount,
        });
    }

    let payment = upi::payment_info(
        &store.upi_id,
        &store.upi_payee_name,
        &store.name,
        order.total_amount,
        &order.order_number,
    );

    Ok(created(OrderCreatedResponse { order, payment }))
}

/// GET /api/orders - customers see their own orders, vendors their stores'
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let order_repo = OrderRepository::new(state.db());

    let orders = if user.is_vendor() {
        let store_repo = StoreRepository::new(state.db());
        let store_ids: Vec<String> = store_repo
            .find_by_owner(&user.id)
            .await?
            .into_iter()
            .filter_map(|s| s.id.map(|t| t.to_string()))
            .collect();
        if store_ids.is_empty() {
            Vec::new()
        } else {
            order_repo.find_by_stores(store_ids).await?
        }
    } else {
        order_repo.find_by_user(&user.id).await?
    };

    Ok(ok(orders))
}

/// Load an order together with its store's owner id
async fn load_order_with_owner(
    state: &ServerState,
    id: &str,
) -> AppResult<(Order, String)> {
    let order_repo = OrderRepository::new(state.db());
    let order = order_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    let store_repo = StoreRepository::new(state.db());
    let store = store_repo
        .find_by_id(&order.store.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Store for this order no longer exists"))?;

    Ok((order, store.owner.to_string()))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let (order, store_owner) = load_order_with_owner(&state, &id).await?;
    ensure(
        &user,
        Action::ViewOrder {
            customer: &order.user.to_string(),
            store_owner: &store_owner,
        },
    )?;
    Ok(ok(order))
}

/// GET /api/orders/:id/poll-status - lightweight projection for polling
pub async fn poll_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderPollStatus>>> {
    let (order, store_owner) = load_order_with_owner(&state, &id).await?;
    ensure(
        &user,
        Action::ViewOrder {
            customer: &order.user.to_string(),
            store_owner: &store_owner,
        },
    )?;
    Ok(ok(order.poll_status()))
}

/// PATCH /api/orders/:id/status - operator-driven transition
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderStatusResponse>>> {
    let (order, store_owner) = load_order_with_owner(&state, &id).await?;
    ensure(&user, Action::OperateOrder { store_owner: &store_owner })?;

    let from = order.order_status;
    let to = payload.status;

    if !from.can_transition_to(to) {
        return Err(AppError::invalid_transition(from.as_str(), to.as_str()));
    }

    if to == OrderStatus::PickedUp && !order.is_otp_verified {
        return Err(AppError::invalid_state(
            "OTP must be verified before marking as picked up",
        ));
    }

    let order_repo = OrderRepository::new(state.db());
    let (updated, minted_otp) = if to == OrderStatus::Ready {
        let minted = otp::issue(shared::util::now_millis())?;
        let updated = order_repo
            .update_status(&id, to, Some((minted.code.clone(), minted.expires_at)))
            .await?;
        (updated, Some(minted.code))
    } else {
        let updated = order_repo.update_status(&id, to, None).await?;
        (updated, None)
    };

    tracing::info!(
        order = %updated.order_number,
        from = %from,
        to = %to,
        operator = %user.id,
        "Order status updated"
    );

    if let Some(email) = customer_email(&state, &updated).await {
        state.notifier.publish(Notification::StatusChanged {
            email: email.clone(),
            order_number: updated.order_number.clone(),
            status: to.as_str().to_string(),
        });
        if let Some(code) = &minted_otp {
            state.notifier.publish(Notification::OtpIssued {
                email,
                order_number: updated.order_number.clone(),
                otp: code.clone(),
            });
        }
    }

    Ok(ok(OrderStatusResponse {
        order: updated,
        otp: minted_otp,
    }))
}

/// PATCH /api/orders/:id/payment-status - operator toggles payment outcome
pub async fn update_payment_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let (order, store_owner) = load_order_with_owner(&state, &id).await?;
    ensure(&user, Action::OperateOrder { store_owner: &store_owner })?;

    let payment_status: PaymentStatus = payload.payment_status.parse().map_err(|_| {
        AppError::invalid_state(format!(
            "Invalid payment status: {}",
            payload.payment_status
        ))
    })?;

    // Payment confirmation implicitly accepts a freshly placed order
    let advance = payment_status == PaymentStatus::Success
        && order.order_status == OrderStatus::Placed;

    let order_repo = OrderRepository::new(state.db());
    let updated = order_repo
        .update_payment(&id, payment_status, payload.transaction_id, advance)
        .await?;

    tracing::info!(
        order = %updated.order_number,
        payment_status = %payment_status,
        accepted = advance,
        "Payment status updated"
    );

    if payment_status == PaymentStatus::Success
        && let Some(email) = customer_email(&state, &updated).await
    {
        state.notifier.publish(Notification::OrderAccepted {
            email,
            order_number: updated.order_number.clone(),
        });
    }

    Ok(ok(updated))
}

/// POST /api/orders/:id/verify-otp - confirm pickup
pub async fn verify_otp(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let (order, store_owner) = load_order_with_owner(&state, &id).await?;
    ensure(&user, Action::OperateOrder { store_owner: &store_owner })?;

    let valid = otp::verify(
        order.otp.as_deref(),
        &payload.otp,
        order.otp_expires_at,
        shared::util::now_millis(),
    );
    if !valid {
        tracing::warn!(order = %order.order_number, "OTP verification failed");
        return Err(AppError::InvalidOtp);
    }

    let order_repo = OrderRepository::new(state.db());
    let updated = order_repo.confirm_pickup(&id).await?;

    tracing::info!(order = %updated.order_number, "Pickup confirmed");

    if let Some(email) = customer_email(&state, &updated).await {
        state.notifier.publish(Notification::PickupConfirmed {
            email,
            order_number: updated.order_number.clone(),
        });
    }

    Ok(ok(updated))
}
