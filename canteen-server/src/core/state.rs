//! Server state
//!
//! [`ServerState`] holds shared references to every service; cloning it is a
//! handful of `Arc` bumps and every request handler gets one.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{MenuItemRepository, OrderRepository};
use crate::events::EventBus;
use crate::orders::OrdersManager;

/// Shared server state
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | embedded database handle |
/// | jwt_service | token validation |
/// | events | lifecycle event broadcaster |
/// | orders | order lifecycle manager |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub events: EventBus,
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// Manual constructor; [`ServerState::initialize`] is the usual entry point
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        events: EventBus,
        orders: Arc<OrdersManager>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            events,
            orders,
        }
    }

    /// Initialize all services in dependency order
    ///
    /// # Panics
    ///
    /// Panics if the working directory or database cannot be initialized;
    /// the server cannot run without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("canteen.db");
        let db_service = DbService::open(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let events = EventBus::new();

        let catalog = Arc::new(MenuItemRepository::new(db.clone()));
        let orders = OrdersManager::new(OrderRepository::new(db.clone()), catalog, events.clone())
            .await
            .expect("Failed to initialize orders manager");

        Self::new(
            config.clone(),
            db,
            jwt_service,
            events,
            Arc::new(orders),
        )
    }

    /// Assemble state on top of an already-open database (tests use the
    /// in-memory engine here)
    pub async fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let events = EventBus::new();

        let catalog = Arc::new(MenuItemRepository::new(db.clone()));
        let orders = OrdersManager::new(OrderRepository::new(db.clone()), catalog, events.clone())
            .await
            .expect("Failed to initialize orders manager");

        Self::new(config, db, jwt_service, events, Arc::new(orders))
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
