//! Store API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::ApiResponse;

use crate::auth::{Action, CurrentUser, ensure};
use crate::core::ServerState;
use crate::db::models::{MenuItem, Store, StoreCreate, StoreUpdate};
use crate::db::repository::{MenuItemRepository, StoreRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, created, ok};

/// GET /api/stores - list active stores
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Store>>>> {
    let repo = StoreRepository::new(state.db());
    let stores = repo.find_all_active().await?;
    Ok(ok(stores))
}

/// GET /api/stores/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let repo = StoreRepository::new(state.db());
    let store = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {} not found", id)))?;
    Ok(ok(store))
}

/// POST /api/stores - create a store owned by the caller
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<StoreCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Store>>)> {
    ensure(&user, Action::CreateStore)?;

    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.upi_id, "upi_id", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.upi_payee_name, "upi_payee_name", MAX_NAME_LEN)?;

    let repo = StoreRepository::new(state.db());
    let store = repo.create(&user.id, payload).await?;

    tracing::info!(store = %store.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        owner = %user.id, "Store created");

    Ok(created(store))
}

/// PUT /api/stores/:id - owner-only edits
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let repo = StoreRepository::new(state.db());
    let store = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {} not found", id)))?;

    ensure(&user, Action::ManageStore { owner: &store.owner.to_string() })?;

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.upi_id, "upi_id", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.upi_payee_name, "upi_payee_name", MAX_NAME_LEN)?;

    let updated = repo.update(&id, payload).await?;
    Ok(ok(updated))
}

/// GET /api/stores/:id/menu - available items for ordering
pub async fn menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let store_repo = StoreRepository::new(state.db());
    let store = store_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {} not found", id)))?;

    let menu_repo = MenuItemRepository::new(state.db());
    let store_id = store.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let items = menu_repo.find_by_store(&store_id, true).await?;
    Ok(ok(items))
}
