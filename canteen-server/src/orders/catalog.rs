//! Catalog snapshot contract
//!
//! The lifecycle manager never owns catalog data; it reads a point-in-time
//! `{unit_price, available}` snapshot per item name at the moment an order is
//! created. Results must not be cached across requests.

use crate::db::repository::RepoResult;
use async_trait::async_trait;

/// Point-in-time price/availability of one catalog item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogSnapshot {
    pub unit_price: f64,
    pub available: bool,
}

/// Read-only catalog lookup by item name
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// `None` means the item does not exist in the catalog
    async fn lookup(&self, name: &str) -> RepoResult<Option<CatalogSnapshot>>;
}
