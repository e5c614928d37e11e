//! Menu Item Repository
//!
//! Catalog reads for order validation and the public menu listing. Also the
//! [`CatalogReader`] implementation handed to the lifecycle manager.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate};
use crate::orders::catalog::{CatalogReader, CatalogSnapshot};
use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All available items, sorted by name
    pub async fn find_available(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE available = true ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find item by its (unique) name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<MenuItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Insert a catalog entry (seeding and tests; no editing API exists here)
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                data.name
            )));
        }

        let item = MenuItem {
            id: None,
            name: data.name,
            price: data.price,
            category: data.category,
            description: data.description,
            available: data.available.unwrap_or(true),
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}

#[async_trait]
impl CatalogReader for MenuItemRepository {
    /// Price/availability snapshot at the moment of the call; never cached
    async fn lookup(&self, name: &str) -> RepoResult<Option<CatalogSnapshot>> {
        let item = self.find_by_name(name).await?;
        Ok(item.map(|i| CatalogSnapshot {
            unit_price: i.price,
            available: i.available,
        }))
    }
}
