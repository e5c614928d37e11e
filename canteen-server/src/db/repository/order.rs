//! Order Repository
//!
//! Persistence for the `order` table. Orders are created once and mutated
//! only by status updates; there is no delete. Transition validation lives in
//! the lifecycle manager; callers are expected to hold the per-order lock
//! around read-validate-write sequences.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus};
use chrono::Utc;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid order id: {}", id)))?;
        if rid.table() != TABLE {
            return Err(RepoError::NotFound(format!("Invalid order id: {}", id)));
        }
        Ok(rid)
    }

    /// Persist a new order; the store assigns the record id
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by "order:xxxx" id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = match Self::parse_id(id) {
            Ok(rid) => rid,
            Err(_) => return Ok(None),
        };
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// All orders of one owner, newest first (ties in insertion order)
    pub async fn find_for_owner(&self, owner_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE owner_id = $owner ORDER BY created_at DESC, seq ASC")
            .bind(("owner", owner_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders, newest first (ties in insertion order)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC, seq ASC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Overwrite the status of an existing order and return the updated row
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let rid = Self::parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $order SET status = $status, updated_at = $updated_at")
            .bind(("order", rid))
            .bind(("status", status))
            .bind(("updated_at", Utc::now()))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Highest `seq` currently stored, 0 when the table is empty.
    /// Seeds the in-process insertion counter at startup.
    pub async fn max_seq(&self) -> RepoResult<i64> {
        #[derive(Debug, Deserialize)]
        struct MaxSeq {
            max_seq: Option<i64>,
        }

        let rows: Vec<MaxSeq> = self
            .base
            .db()
            .query("SELECT math::max(seq) AS max_seq FROM order GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().and_then(|r| r.max_seq).unwrap_or(0))
    }
}
