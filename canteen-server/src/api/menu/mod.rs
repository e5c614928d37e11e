//! Menu API module
//!
//! Read-only: the catalog is edited elsewhere; this server only serves the
//! listing the front-ends render and order against.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(handler::list))
}
