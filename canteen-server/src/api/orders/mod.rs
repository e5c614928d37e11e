//! Order API module
//!
//! Student routes (create, own listing, cancel) and admin routes (full
//! listing, status transition). Authentication is enforced globally by
//! `require_auth`; the admin sub-router layers `require_admin` on top.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/", post(handler::create))
        .route("/my", get(handler::list_my))
        .route("/{id}/cancel", put(handler::cancel));

    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/{id}/status", put(handler::set_status))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
