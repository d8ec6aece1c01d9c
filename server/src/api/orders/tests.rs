//! Order lifecycle flow tests
//!
//! Drive the real router (auth middleware included) against an in-memory
//! database: intake, payment acceptance, the status chain, OTP pickup.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use serde_json::{Value, json};
use tower::Service;

use crate::auth::{JwtConfig, JwtService};
use crate::core::{Config, ServerState, build_router};
use crate::db::DbService;
use crate::db::models::{ROLE_CUSTOMER, ROLE_VENDOR, UserCreate};
use crate::db::repository::{MenuItemRepository, StoreRepository, UserRepository};
use crate::notify::{Notification, Notifier};

struct TestApp {
    router: Router,
    state: ServerState,
    /// Receiver side of the notification queue, so tests can observe
    /// what the handlers published
    notifications: tokio::sync::mpsc::Receiver<Notification>,
    customer_token: String,
    vendor_token: String,
    other_vendor_token: String,
    store_id: String,
    thali_id: String,
    chaas_id: String,
}

impl TestApp {
    fn drain_notifications(&mut self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            kinds.push(n.kind());
        }
        kinds
    }
}

fn test_jwt() -> JwtService {
    JwtService::with_config(JwtConfig {
        secret: "order-flow-test-secret-0123456789abcdef".to_string(),
        expiration_minutes: 60,
        issuer: "tiffin-server".to_string(),
        audience: "tiffin-clients".to_string(),
    })
}

async fn setup() -> TestApp {
    let db_service = DbService::memory().await.expect("mem db");
    let (notifier, notifications) = Notifier::new(64);
    let jwt = Arc::new(test_jwt());
    let state = ServerState::new(
        Config::with_overrides("/tmp/tiffin-test", 0),
        db_service.db.clone(),
        jwt.clone(),
        notifier,
    );

    let users = UserRepository::new(state.db());
    let customer = users
        .create(UserCreate {
            username: "asha".into(),
            email: "asha@campus.edu".into(),
            password_hash: "$argon2id$fake".into(),
            display_name: "Asha".into(),
            role: ROLE_CUSTOMER.into(),
            phone: None,
        })
        .await
        .unwrap();
    let vendor = users
        .create(UserCreate {
            username: "mess".into(),
            email: "mess@campus.edu".into(),
            password_hash: "$argon2id$fake".into(),
            display_name: "North Mess".into(),
            role: ROLE_VENDOR.into(),
            phone: None,
        })
        .await
        .unwrap();
    let other_vendor = users
        .create(UserCreate {
            username: "juice".into(),
            email: "juice@campus.edu".into(),
            password_hash: "$argon2id$fake".into(),
            display_name: "Juice Corner".into(),
            role: ROLE_VENDOR.into(),
            phone: None,
        })
        .await
        .unwrap();

    let vendor_id = vendor.id.unwrap().to_string();
    let stores = StoreRepository::new(state.db());
    let store = stores
        .create(
            &vendor_id,
            crate::db::models::StoreCreate {
                name: "North Mess".into(),
                description: None,
                upi_id: "northmess@upi".into(),
                upi_payee_name: None,
            },
        )
        .await
        .unwrap();
    let store_id = store.id.unwrap().to_string();

    let menu = MenuItemRepository::new(state.db());
    let thali = menu
        .create(&store_id, "Thali".into(), None, 100.0, None)
        .await
        .unwrap();
    let chaas = menu
        .create(&store_id, "Chaas".into(), None, 50.0, None)
        .await
        .unwrap();

    let customer_id = customer.id.unwrap().to_string();
    let other_vendor_id = other_vendor.id.unwrap().to_string();

    TestApp {
        router: build_router(state.clone()),
        state,
        notifications,
        customer_token: jwt.generate_token(&customer_id, "asha", ROLE_CUSTOMER).unwrap(),
        vendor_token: jwt.generate_token(&vendor_id, "mess", ROLE_VENDOR).unwrap(),
        other_vendor_token: jwt
            .generate_token(&other_vendor_id, "juice", ROLE_VENDOR)
            .unwrap(),
        store_id,
        thali_id: thali.id.unwrap().to_string(),
        chaas_id: chaas.id.unwrap().to_string(),
    }
}

async fn request(
    app: &mut TestApp,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (u16, Value) {
    let mut builder = http::Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    let body = match body {
        Some(v) => {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();

    let response = app.router.call(req).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn place_order(app: &mut TestApp) -> (String, Value) {
    let token = app.customer_token.clone();
    let body = json!({
        "storeId": app.store_id.clone(),
        "items": [
            {"menuItemId": app.thali_id.clone(), "quantity": 2},
            {"menuItemId": app.chaas_id.clone(), "quantity": 1},
        ],
    });
    let (status, resp) = request(app, "POST", "/api/orders", &token, Some(body)).await;
    assert_eq!(status, 201, "unexpected response: {resp}");
    let order_id = resp["data"]["order"]["id"].as_str().unwrap().to_string();
    (order_id, resp)
}

#[tokio::test]
async fn test_order_intake_totals_and_payment_links() {
    let mut app = setup().await;
    let (_, resp) = place_order(&mut app).await;

    assert_eq!(resp["success"], true);
    let order = &resp["data"]["order"];
    assert_eq!(order["total_amount"], 250.0);
    assert_eq!(order["order_status"], "placed");
    assert_eq!(order["payment_status"], "pending");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    // The OTP column never appears in API payloads
    assert!(order.get("otp").is_none());

    let number = order["order_number"].as_str().unwrap();
    assert_eq!(number.len(), 15);
    assert!(number.starts_with("ORD"));

    let payment = &resp["data"]["payment"];
    assert_eq!(payment["storeUpiId"], "northmess@upi");
    assert_eq!(payment["amount"], 250.0);
    let link = payment["upiLink"].as_str().unwrap();
    assert!(link.starts_with("upi://pay?pa=northmess@upi"));
    assert!(link.contains("am=250.00"));
    assert!(link.contains("cu=INR"));
    assert!(payment["upiAppLinks"]["gpay"].as_str().unwrap().starts_with("tez://upi/pay"));
}

#[tokio::test]
async fn test_intake_rejects_inactive_store_and_foreign_items() {
    let mut app = setup().await;
    let customer = app.customer_token.clone();
    let vendor2 = app.other_vendor_token.clone();

    // Item from another store
    let (status, resp) = request(
        &mut app,
        "POST",
        "/api/stores",
        &vendor2,
        Some(json!({"name": "Juice Corner", "upi_id": "juice@upi"})),
    )
    .await;
    assert_eq!(status, 201, "unexpected response: {resp}");
    let other_store = resp["data"]["id"].as_str().unwrap().to_string();

    let thali = app.thali_id.clone();
    let (status, resp) = request(
        &mut app,
        "POST",
        "/api/orders",
        &customer,
        Some(json!({"storeId": other_store, "items": [{"menuItemId": thali.clone()}]})),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(resp["success"], false);
    assert!(resp["message"].as_str().unwrap().contains("Thali"));

    // Unknown store
    let (status, _) = request(
        &mut app,
        "POST",
        "/api/orders",
        &customer,
        Some(json!({"storeId": "store:nope", "items": [{"menuItemId": thali.clone()}]})),
    )
    .await;
    assert_eq!(status, 404);

    // Deactivated store stops taking orders
    let stores = StoreRepository::new(app.state.db());
    stores
        .update(
            &app.store_id.clone(),
            crate::db::models::StoreUpdate {
                name: None,
                description: None,
                upi_id: None,
                upi_payee_name: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

    let store_id = app.store_id.clone();
    let (status, resp) = request(
        &mut app,
        "POST",
        "/api/orders",
        &customer,
        Some(json!({"storeId": store_id, "items": [{"menuItemId": thali}]})),
    )
    .await;
    assert_eq!(status, 422);
    assert!(resp["message"].as_str().unwrap().contains("not accepting orders"));
}

#[tokio::test]
async fn test_scenario_b_payment_success_accepts_order() {
    let mut app = setup().await;
    let (order_id, _) = place_order(&mut app).await;
    let vendor = app.vendor_token.clone();

    let (status, resp) = request(
        &mut app,
        "PATCH",
        &format!("/api/orders/{order_id}/payment-status"),
        &vendor,
        Some(json!({"paymentStatus": "success", "transactionId": "TXN99"})),
    )
    .await;
    assert_eq!(status, 200, "unexpected response: {resp}");
    assert_eq!(resp["data"]["payment_status"], "success");
    assert_eq!(resp["data"]["order_status"], "accepted");
    assert_eq!(resp["data"]["transaction_id"], "TXN99");
}

#[tokio::test]
async fn test_invalid_payment_status_value_rejected() {
    let mut app = setup().await;
    let (order_id, _) = place_order(&mut app).await;
    let vendor = app.vendor_token.clone();

    let (status, resp) = request(
        &mut app,
        "PATCH",
        &format!("/api/orders/{order_id}/payment-status"),
        &vendor,
        Some(json!({"paymentStatus": "paid"})),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(resp["success"], false);
}

#[tokio::test]
async fn test_scenario_c_transition_from_placed_rejected() {
    let mut app = setup().await;
    let (order_id, _) = place_order(&mut app).await;
    let vendor = app.vendor_token.clone();

    let (status, resp) = request(
        &mut app,
        "PATCH",
        &format!("/api/orders/{order_id}/status"),
        &vendor,
        Some(json!({"status": "processing"})),
    )
    .await;
    assert_eq!(status, 422);
    let message = resp["message"].as_str().unwrap();
    assert!(message.contains("placed"));
    assert!(message.contains("processing"));

    // State unchanged
    let customer = app.customer_token.clone();
    let (_, poll) = request(
        &mut app,
        "GET",
        &format!("/api/orders/{order_id}/poll-status"),
        &customer,
        None,
    )
    .await;
    assert_eq!(poll["data"]["order_status"], "placed");
}

#[tokio::test]
async fn test_full_lifecycle_with_otp_pickup() {
    let mut app = setup().await;
    let (order_id, _) = place_order(&mut app).await;
    let vendor = app.vendor_token.clone();

    let uri_payment = format!("/api/orders/{order_id}/payment-status");
    let uri_status = format!("/api/orders/{order_id}/status");

    let (status, _) = request(
        &mut app,
        "PATCH",
        &uri_payment,
        &vendor,
        Some(json!({"paymentStatus": "success"})),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = request(
        &mut app,
        "PATCH",
        &uri_status,
        &vendor,
        Some(json!({"status": "processing"})),
    )
    .await;
    assert_eq!(status, 200);

    // Scenario D: ready mints a 6-digit OTP
    let (status, resp) = request(
        &mut app,
        "PATCH",
        &uri_status,
        &vendor,
        Some(json!({"status": "ready"})),
    )
    .await;
    assert_eq!(status, 200);
    let otp = resp["data"]["otp"].as_str().unwrap().to_string();
    assert_eq!(otp.len(), 6);
    assert!(otp.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(resp["data"]["order"]["order_status"], "ready");
    let expires_at = resp["data"]["order"]["otp_expires_at"].as_i64().unwrap();
    let delta = expires_at - shared::util::now_millis();
    assert!(delta > 14 * 60 * 1000 && delta <= 15 * 60 * 1000);

    // Repeating ready is rejected, not silently accepted
    let (status, _) = request(
        &mut app,
        "PATCH",
        &uri_status,
        &vendor,
        Some(json!({"status": "ready"})),
    )
    .await;
    assert_eq!(status, 422);

    // picked_up without OTP verification is an invalid state
    let (status, resp) = request(
        &mut app,
        "PATCH",
        &uri_status,
        &vendor,
        Some(json!({"status": "picked_up"})),
    )
    .await;
    assert_eq!(status, 422);
    assert!(resp["message"].as_str().unwrap().contains("OTP"));

    // Wrong code: rejected, no state change
    let uri_verify = format!("/api/orders/{order_id}/verify-otp");
    let wrong = if otp == "123456" { "654321" } else { "123456" };
    let (status, _) = request(
        &mut app,
        "POST",
        &uri_verify,
        &vendor,
        Some(json!({"otp": wrong})),
    )
    .await;
    assert_eq!(status, 400);

    // Correct code: verified and picked up in one step
    let (status, resp) = request(
        &mut app,
        "POST",
        &uri_verify,
        &vendor,
        Some(json!({"otp": otp})),
    )
    .await;
    assert_eq!(status, 200, "unexpected response: {resp}");
    assert_eq!(resp["data"]["order_status"], "picked_up");
    assert_eq!(resp["data"]["is_otp_verified"], true);

    // Every step queued its customer notification, in order
    let kinds = app.drain_notifications();
    assert_eq!(
        kinds,
        vec![
            "order_placed",
            "order_accepted",
            "status_changed", // processing
            "status_changed", // ready
            "otp_issued",
            "pickup_confirmed",
        ]
    );
}

#[tokio::test]
async fn test_ownership_and_role_checks() {
    let mut app = setup().await;
    let (order_id, _) = place_order(&mut app).await;
    let uri_status = format!("/api/orders/{order_id}/status");

    // Customers cannot drive the lifecycle
    let customer = app.customer_token.clone();
    let (status, _) = request(
        &mut app,
        "PATCH",
        &uri_status,
        &customer,
        Some(json!({"status": "processing"})),
    )
    .await;
    assert_eq!(status, 403);

    // Nor can a vendor who does not own the store
    let other = app.other_vendor_token.clone();
    let (status, _) = request(
        &mut app,
        "PATCH",
        &uri_status,
        &other,
        Some(json!({"status": "processing"})),
    )
    .await;
    assert_eq!(status, 403);

    // A stranger cannot read the order either
    let (status, _) = request(
        &mut app,
        "GET",
        &format!("/api/orders/{order_id}"),
        &other,
        None,
    )
    .await;
    assert_eq!(status, 403);

    // Requests without a token are turned away at the middleware
    let req = http::Request::builder()
        .method("GET")
        .uri("/api/orders")
        .body(Body::empty())
        .unwrap();
    let response = app.router.call(req).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_order_listing_is_role_scoped() {
    let mut app = setup().await;
    place_order(&mut app).await;

    let customer = app.customer_token.clone();
    let (status, resp) = request(&mut app, "GET", "/api/orders", &customer, None).await;
    assert_eq!(status, 200);
    assert_eq!(resp["data"].as_array().unwrap().len(), 1);

    let vendor = app.vendor_token.clone();
    let (_, resp) = request(&mut app, "GET", "/api/orders", &vendor, None).await;
    assert_eq!(resp["data"].as_array().unwrap().len(), 1);

    // A vendor with no stores sees nothing
    let other = app.other_vendor_token.clone();
    let (_, resp) = request(&mut app, "GET", "/api/orders", &other, None).await;
    assert_eq!(resp["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_snapshot_prices_survive_menu_edits() {
    let mut app = setup().await;
    let (order_id, _) = place_order(&mut app).await;

    // Double every menu price after the order is placed
    let menu = MenuItemRepository::new(app.state.db());
    menu.update(
        &app.thali_id.clone(),
        crate::db::models::MenuItemUpdate {
            name: None,
            description: None,
            price: Some(200.0),
            category: None,
            is_available: None,
        },
    )
    .await
    .unwrap();

    let customer = app.customer_token.clone();
    let (_, resp) = request(
        &mut app,
        "GET",
        &format!("/api/orders/{order_id}"),
        &customer,
        None,
    )
    .await;
    assert_eq!(resp["data"]["total_amount"], 250.0);
    assert_eq!(resp["data"]["items"][0]["price"], 100.0);
}
