//! Order API Handlers
//!
//! Thin layer over [`OrdersManager`]: extract identity, delegate, map domain
//! errors into HTTP responses via `From<OrderError> for AppError`.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CreateOrderRequest, Order, SetStatusRequest};
use crate::utils::AppResult;

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state.orders.create(&user, payload).await?;
    Ok(Json(order))
}

/// GET /api/orders/my - the caller's orders, newest first
pub async fn list_my(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_for_owner(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/all - every order, newest first (admin)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_all().await?;
    Ok(Json(orders))
}

/// PUT /api/orders/{id}/status - move an order along the transition table (admin)
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.orders.set_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/cancel - cancel the caller's own pending order
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.cancel_own(&id, &user).await?;
    Ok(Json(order))
}
