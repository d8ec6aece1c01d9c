//! Auth API module

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use serde_json::{Value, json};
    use tower::Service;

    use crate::auth::JwtService;
    use crate::core::{Config, ServerState, build_router};
    use crate::db::DbService;
    use crate::notify::Notifier;

    async fn test_router() -> axum::Router {
        let db_service = DbService::memory().await.expect("mem db");
        let (notifier, _rx) = Notifier::new(8);
        let state = ServerState::new(
            Config::with_overrides("/tmp/tiffin-test", 0),
            db_service.db,
            Arc::new(JwtService::new()),
            notifier,
        );
        build_router(state)
    }

    async fn post_json(router: &mut axum::Router, uri: &str, body: Value) -> (u16, Value) {
        let req = http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.call(req).await.unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_register_login_me_roundtrip() {
        let mut router = test_router().await;

        let (status, resp) = post_json(
            &mut router,
            "/api/auth/register",
            json!({
                "username": "asha",
                "email": "Asha@Campus.edu",
                "password": "hunter2hunter2",
                "role": "customer",
            }),
        )
        .await;
        assert_eq!(status, 201, "unexpected response: {resp}");
        assert_eq!(resp["data"]["email"], "asha@campus.edu");
        // Password hash never leaves the server
        assert!(resp["data"].get("password_hash").is_none());

        let (status, resp) = post_json(
            &mut router,
            "/api/auth/login",
            json!({"username": "asha", "password": "hunter2hunter2"}),
        )
        .await;
        assert_eq!(status, 200, "unexpected response: {resp}");
        let token = resp["data"]["token"].as_str().unwrap().to_string();

        let req = http::Request::builder()
            .method("GET")
            .uri("/api/auth/me")
            .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router.call(req).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform() {
        let mut router = test_router().await;

        post_json(
            &mut router,
            "/api/auth/register",
            json!({
                "username": "meera",
                "email": "meera@campus.edu",
                "password": "hunter2hunter2",
            }),
        )
        .await;

        // Wrong password and unknown user produce identical messages
        let (status, wrong_pass) = post_json(
            &mut router,
            "/api/auth/login",
            json!({"username": "meera", "password": "nope-nope-nope"}),
        )
        .await;
        assert_eq!(status, 400);

        let (status, no_user) = post_json(
            &mut router,
            "/api/auth/login",
            json!({"username": "ghost", "password": "nope-nope-nope"}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(wrong_pass["message"], no_user["message"]);
    }

    #[tokio::test]
    async fn test_register_rejects_admin_and_duplicates() {
        let mut router = test_router().await;

        let (status, _) = post_json(
            &mut router,
            "/api/auth/register",
            json!({
                "username": "boss",
                "email": "boss@campus.edu",
                "password": "hunter2hunter2",
                "role": "admin",
            }),
        )
        .await;
        assert_eq!(status, 400);

        let body = json!({
            "username": "dev",
            "email": "dev@campus.edu",
            "password": "hunter2hunter2",
        });
        let (status, _) = post_json(&mut router, "/api/auth/register", body.clone()).await;
        assert_eq!(status, 201);
        let (status, resp) = post_json(&mut router, "/api/auth/register", body).await;
        assert_eq!(status, 409);
        assert_eq!(resp["success"], false);
    }
}
