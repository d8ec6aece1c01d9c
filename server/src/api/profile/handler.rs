//! Profile Handlers

use axum::{Json, extract::State};
use shared::ApiResponse;
use shared::client::{ProfileUpdateRequest, UserInfo};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserProfileUpdate;
use crate::db::repository::UserRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ok};

/// GET /api/profile
pub async fn get_profile(
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

/// PUT /api/profile - display name and phone only
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ProfileUpdateRequest>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    validate_optional_text(&req.display_name, "display_name", MAX_NAME_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let repo = UserRepository::new(state.db());
    let record = repo
        .update_profile(
            &user.id,
            UserProfileUpdate {
                display_name: req.display_name,
                phone: req.phone,
            },
        )
        .await?;

    Ok(ok(record.to_user_info()))
}
