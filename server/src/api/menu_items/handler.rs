//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::ApiResponse;

use crate::auth::{Action, CurrentUser, ensure};
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{MenuItemRepository, StoreRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_amount, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, created, ok};

/// Load the item's store and check the caller owns it
async fn ensure_store_owner(
    state: &ServerState,
    user: &CurrentUser,
    store_id: &str,
) -> AppResult<()> {
    let store_repo = StoreRepository::new(state.db());
    let store = store_repo
        .find_by_id(store_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {} not found", store_id)))?;
    ensure(user, Action::ManageStore { owner: &store.owner.to_string() })
}

/// POST /api/menu-items
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_amount(payload.price, "price")?;

    ensure_store_owner(&state, &user, &payload.store_id).await?;

    let repo = MenuItemRepository::new(state.db());
    let item = repo
        .create(
            &payload.store_id,
            payload.name,
            payload.description,
            payload.price,
            payload.category,
        )
        .await?;

    Ok(created(item))
}

/// GET /api/menu-items/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    Ok(ok(item))
}

/// PUT /api/menu-items/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;

    ensure_store_owner(&state, &user, &item.store.to_string()).await?;

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_amount(price, "price")?;
    }

    let updated = repo.update(&id, payload).await?;
    Ok(ok(updated))
}

/// DELETE /api/menu-items/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let repo = MenuItemRepository::new(state.db());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;

    ensure_store_owner(&state, &user, &item.store.to_string()).await?;

    let deleted = repo.delete(&id).await?;
    Ok(ok(deleted))
}
