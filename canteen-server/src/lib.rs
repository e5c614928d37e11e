//! Canteen Server - campus canteen ordering backend
//!
//! # Architecture overview
//!
//! REST API plus a real-time push channel for order lifecycle events:
//!
//! - **Orders** (`orders`): lifecycle state machine, per-order transition
//!   serialization, catalog-snapshot validation
//! - **Events** (`events`): broadcast bus and WebSocket fan-out
//! - **Database** (`db`): embedded SurrealDB storage
//! - **Auth** (`auth`): JWT validation, student/admin roles
//! - **HTTP API** (`api`): RESTful endpoints
//!
//! # Module structure
//!
//! ```text
//! canteen-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT validation, role middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer (models, repositories)
//! ├── events/        # lifecycle event bus + WebSocket push
//! ├── orders/        # order lifecycle core
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod events;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use db::models::OrderStatus;
pub use events::{EventBus, LifecycleEvent};
pub use orders::{OrderError, OrdersManager};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - tracing with a fixed target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   ______            __
  / ____/___ _____  / /____  ___  ____
 / /   / __ `/ __ \/ __/ _ \/ _ \/ __ \
/ /___/ /_/ / / / / /_/  __/  __/ / / /
\____/\__,_/_/ /_/\__/\___/\___/_/ /_/
    "#
    );
}
