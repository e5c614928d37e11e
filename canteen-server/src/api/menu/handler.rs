//! Menu API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::db::repository::MenuItemRepository;
use crate::utils::AppResult;

/// GET /api/menu - all available items, sorted by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_available().await?;
    Ok(Json(items))
}
