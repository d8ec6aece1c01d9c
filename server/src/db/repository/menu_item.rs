//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{MenuItem, MenuItemUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MENU_ITEM_TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

#[derive(Debug, Serialize)]
struct MenuItemRecord {
    store: String,
    name: String,
    description: Option<String>,
    price: f64,
    category: Option<String>,
    is_available: bool,
    created_at: i64,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a menu item in the given store
    pub async fn create(
        &self,
        store_id: &str,
        name: String,
        description: Option<String>,
        price: f64,
        category: Option<String>,
    ) -> RepoResult<MenuItem> {
        let record = MenuItemRecord {
            store: to_record_id("store", store_id).to_string(),
            name,
            description,
            price,
            category,
            is_available: true,
            created_at: shared::util::now_millis(),
        };

        let created: Option<MenuItem> = self
            .base
            .db()
            .create(MENU_ITEM_TABLE)
            .content(record)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let record_id = to_record_id(MENU_ITEM_TABLE, id);
        let item: Option<MenuItem> = self.base.db().select(record_id).await?;
        Ok(item)
    }

    /// Menu for a store; `only_available` filters out disabled items
    pub async fn find_by_store(
        &self,
        store_id: &str,
        only_available: bool,
    ) -> RepoResult<Vec<MenuItem>> {
        let store = to_record_id("store", store_id).to_string();
        let query = if only_available {
            "SELECT * FROM menu_item WHERE store = $store AND is_available = true ORDER BY name"
        } else {
            "SELECT * FROM menu_item WHERE store = $store ORDER BY name"
        };
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(query)
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let record_id = to_record_id(MENU_ITEM_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.is_available.is_some() {
            set_parts.push("is_available = $is_available");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", record_id));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.is_available {
            query = query.bind(("is_available", v));
        }

        let mut result = query.await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = to_record_id(MENU_ITEM_TABLE, id);
        let deleted: Option<MenuItem> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> MenuItemRepository {
        let service = DbService::memory().await.expect("mem db");
        MenuItemRepository::new(service.db)
    }

    #[tokio::test]
    async fn test_create_and_list_by_store() {
        let repo = repo().await;
        repo.create("store:s1", "Masala Dosa".into(), None, 60.0, Some("South Indian".into()))
            .await
            .unwrap();
        repo.create("store:s1", "Filter Coffee".into(), None, 20.0, None)
            .await
            .unwrap();
        repo.create("store:s2", "Veg Roll".into(), None, 45.0, None)
            .await
            .unwrap();

        let menu = repo.find_by_store("store:s1", true).await.unwrap();
        assert_eq!(menu.len(), 2);
        assert!(menu.iter().all(|m| m.store.to_string() == "store:s1"));
    }

    #[tokio::test]
    async fn test_unavailable_items_hidden_from_menu() {
        let repo = repo().await;
        let item = repo
            .create("store:s1", "Lassi".into(), None, 30.0, None)
            .await
            .unwrap();
        let id = item.id.unwrap().to_string();

        repo.update(
            &id,
            MenuItemUpdate {
                name: None,
                description: None,
                price: None,
                category: None,
                is_available: Some(false),
            },
        )
        .await
        .unwrap();

        assert!(repo.find_by_store("store:s1", true).await.unwrap().is_empty());
        assert_eq!(repo.find_by_store("store:s1", false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let item = repo
            .create("store:s1", "Tea".into(), None, 10.0, None)
            .await
            .unwrap();
        let id = item.id.unwrap().to_string();

        assert!(repo.delete(&id).await.unwrap());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }
}
