//! Authentication Handlers
//!
//! Registration, login, and current-user info.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use shared::ApiResponse;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ROLE_CUSTOMER, ROLE_VENDOR, User, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, created, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/register
///
/// Creates a customer or vendor account. The admin role is never
/// self-assignable.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    validate_required_text(&req.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    validate_password(&req.password)?;
    if !req.email.contains('@') {
        return Err(AppError::validation("email must be a valid address"));
    }

    let role = match req.role.as_deref() {
        None | Some(ROLE_CUSTOMER) => ROLE_CUSTOMER,
        Some(ROLE_VENDOR) => ROLE_VENDOR,
        Some(other) => {
            return Err(AppError::validation(format!("Unknown role: {other}")));
        }
    };

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let repo = UserRepository::new(state.db());
    let user = repo
        .create(UserCreate {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            password_hash,
            display_name: req
                .display_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| req.username.trim().to_string()),
            role: role.to_string(),
            phone: None,
        })
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(_) => {
                AppError::conflict("Username or email already registered")
            }
            other => other.into(),
        })?;

    tracing::info!(username = %user.username, role = %user.role, "User registered");

    Ok(created(user.to_user_info()))
}

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT token.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let repo = UserRepository::new(state.db());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = state
        .jwt_service()
        .generate_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(ok(LoginResponse {
        token,
        user: user.to_user_info(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let repo = UserRepository::new(state.db());
    let record = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(ok(record.to_user_info()))
}
