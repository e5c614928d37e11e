//! Menu Item Model
//!
//! The catalog is read-only from the order lifecycle's point of view; the
//! lifecycle only ever consumes `{price, available}` snapshots by name.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_true")]
    pub available: bool,
}

/// Create menu item payload (seeding and tests; catalog editing has no API here)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}
