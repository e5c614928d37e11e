//! OrdersManager - order lifecycle core
//!
//! Validates order creation against the catalog snapshot, enforces the status
//! state machine and ownership rules, and publishes one lifecycle event per
//! accepted change.
//!
//! # Operation flow
//!
//! ```text
//! create(owner, lines)
//!     ├─ 1. Validate lines against catalog snapshot (price from catalog)
//!     ├─ 2. Compute total (Decimal, 2 dp)
//!     ├─ 3. Persist order in `pending`
//!     └─ 4. Publish OrderCreated
//!
//! set_status(id, target) / cancel_own(id, requester)
//!     ├─ 1. Acquire the per-order lock
//!     ├─ 2. Re-read current state
//!     ├─ 3. Validate transition (and ownership for cancel)
//!     ├─ 4. Write new status
//!     └─ 5. Publish OrderUpdated
//! ```
//!
//! Steps 1-5 of a status change are serialized per order id; operations on
//! different orders never contend. Nothing is persisted and nothing is
//! published unless the whole operation succeeded.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use super::catalog::CatalogReader;
use super::error::OrderError;
use super::locks::OrderLocks;
use super::money;
use crate::auth::CurrentUser;
use crate::db::models::{CreateOrderRequest, Order, OrderLine, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::events::{EventBus, LifecycleEvent};

/// Order lifecycle manager
///
/// Holds no long-lived order state: every status operation re-reads the
/// current row under the per-order lock before mutating.
pub struct OrdersManager {
    repo: OrderRepository,
    catalog: Arc<dyn CatalogReader>,
    events: EventBus,
    locks: OrderLocks,
    /// Insertion counter backing the listing tie-break
    next_seq: AtomicI64,
}

impl OrdersManager {
    /// Build the manager, seeding the insertion counter from the store
    pub async fn new(
        repo: OrderRepository,
        catalog: Arc<dyn CatalogReader>,
        events: EventBus,
    ) -> Result<Self, OrderError> {
        let max_seq = repo.max_seq().await.map_err(OrderError::Storage)?;
        Ok(Self {
            repo,
            catalog,
            events,
            locks: OrderLocks::new(),
            next_seq: AtomicI64::new(max_seq),
        })
    }

    /// Create an order for `owner` from the requested lines.
    ///
    /// Prices always come from the catalog snapshot at this moment, never
    /// from the client. Quantity defaults to 1. Fails without persisting
    /// anything if the request is empty or any line is absent/unavailable.
    pub async fn create(
        &self,
        owner: &CurrentUser,
        request: CreateOrderRequest,
    ) -> Result<Order, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut lines = Vec::with_capacity(request.items.len());
        for requested in &request.items {
            let snapshot = self
                .catalog
                .lookup(&requested.name)
                .await
                .map_err(OrderError::Storage)?;

            let snapshot = match snapshot {
                Some(s) if s.available => s,
                _ => return Err(OrderError::ItemUnavailable(requested.name.clone())),
            };

            let line = OrderLine {
                name: requested.name.clone(),
                unit_price: snapshot.unit_price,
                quantity: requested.quantity.unwrap_or(1),
            };
            money::validate_line(&line)?;
            lines.push(line);
        }

        let total_amount = money::order_total(&lines)?;
        let now = Utc::now();
        let order = Order {
            id: None,
            owner_id: owner.id.clone(),
            owner_name: owner.username.clone(),
            items: lines,
            total_amount,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed) + 1,
        };

        let order = self.repo.create(order).await.map_err(OrderError::Storage)?;

        tracing::info!(
            target: "orders",
            order_id = %order.id_string(),
            owner = %order.owner_id,
            total = order.total_amount,
            "order created"
        );
        self.events.publish(LifecycleEvent::OrderCreated(order.clone()));
        Ok(order)
    }

    /// Move an order to `target` along the transition table (admin operation).
    ///
    /// Rejects same-state no-ops and any move out of a terminal state.
    pub async fn set_status(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mutex = self.locks.mutex_for(order_id);
        let _guard = mutex.lock().await;

        let order = self
            .repo
            .find_by_id(order_id)
            .await
            .map_err(OrderError::Storage)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if !order.status.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: target,
            });
        }

        let updated = self
            .repo
            .set_status(order_id, target)
            .await
            .map_err(OrderError::Storage)?;

        tracing::info!(
            target: "orders",
            order_id = %updated.id_string(),
            from = %order.status,
            to = %target,
            "order status changed"
        );
        self.events
            .publish(LifecycleEvent::OrderUpdated(updated.clone()));
        Ok(updated)
    }

    /// Cancel the requester's own order.
    ///
    /// Students may only cancel while the order is still `pending`, stricter
    /// than the admin transition table: an order already in preparation is
    /// not the student's to abort.
    pub async fn cancel_own(
        &self,
        order_id: &str,
        requester: &CurrentUser,
    ) -> Result<Order, OrderError> {
        let mutex = self.locks.mutex_for(order_id);
        let _guard = mutex.lock().await;

        let order = self
            .repo
            .find_by_id(order_id)
            .await
            .map_err(OrderError::Storage)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if order.owner_id != requester.id {
            return Err(OrderError::Forbidden);
        }

        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        let updated = self
            .repo
            .set_status(order_id, OrderStatus::Cancelled)
            .await
            .map_err(OrderError::Storage)?;

        tracing::info!(
            target: "orders",
            order_id = %updated.id_string(),
            owner = %updated.owner_id,
            "order cancelled by owner"
        );
        self.events
            .publish(LifecycleEvent::OrderUpdated(updated.clone()));
        Ok(updated)
    }

    /// All orders of one owner, newest first
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Order>, OrderError> {
        self.repo
            .find_for_owner(owner_id)
            .await
            .map_err(OrderError::Storage)
    }

    /// All orders, newest first (admin operation; owner identity is on the row)
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        self.repo.find_all().await.map_err(OrderError::Storage)
    }
}
