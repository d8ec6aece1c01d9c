//! Order API module
//!
//! Intake, lifecycle transitions, payment status, and OTP pickup
//! confirmation.

mod handler;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/payment-status", patch(handler::update_payment_status))
        .route("/{id}/verify-otp", post(handler::verify_otp))
        .route("/{id}/poll-status", get(handler::poll_status))
}
