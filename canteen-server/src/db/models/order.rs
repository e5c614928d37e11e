//! Order Model
//!
//! Orders are append-only: created once, mutated only through status
//! transitions, never deleted.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Order Status
// =============================================================================

/// Order status state machine
///
/// ```text
/// pending    -> preparing | cancelled
/// preparing  -> ready | cancelled
/// ready      -> completed | cancelled
/// completed  -> (terminal)
/// cancelled  -> (terminal)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition from `self` to `target` follows one of the
    /// directed edges above. Same-state no-ops are not edges.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Pending, Preparing)
                | (Pending, Cancelled)
                | (Preparing, Ready)
                | (Preparing, Cancelled)
                | (Ready, Completed)
                | (Ready, Cancelled)
        )
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line of an order: name, unit price snapshot, quantity.
///
/// `unit_price` is captured from the catalog at creation time; later catalog
/// price changes never affect existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

/// Persisted order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub owner_id: String,
    pub owner_name: String,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Monotonic insertion counter; listing tie-break for equal `created_at`
    pub seq: i64,
}

impl Order {
    /// "order:xxxx" form of the record id, empty before persistence
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested line in a create-order payload. The client never supplies a
/// price; quantity defaults to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
}

/// Admin status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}
