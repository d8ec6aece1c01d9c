//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{Store, StoreCreate, StoreUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const STORE_TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

#[derive(Debug, Serialize)]
struct StoreRecord {
    name: String,
    description: Option<String>,
    owner: String,
    upi_id: String,
    upi_payee_name: String,
    is_active: bool,
    created_at: i64,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a store owned by the given vendor
    pub async fn create(&self, owner_id: &str, data: StoreCreate) -> RepoResult<Store> {
        let payee_name = data.upi_payee_name.unwrap_or_else(|| data.name.clone());
        let record = StoreRecord {
            name: data.name,
            description: data.description,
            owner: to_record_id("user", owner_id).to_string(),
            upi_id: data.upi_id,
            upi_payee_name: payee_name,
            is_active: true,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Store> = self.base.db().create(STORE_TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }

    /// List active stores
    pub async fn find_all_active(&self) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(stores)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Store>> {
        let record_id = to_record_id(STORE_TABLE, id);
        let store: Option<Store> = self.base.db().select(record_id).await?;
        Ok(store)
    }

    /// Stores owned by a vendor
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Store>> {
        let owner = to_record_id("user", owner_id).to_string();
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store WHERE owner = $owner ORDER BY name")
            .bind(("owner", owner))
            .await?
            .take(0)?;
        Ok(stores)
    }

    /// Update a store
    pub async fn update(&self, id: &str, data: StoreUpdate) -> RepoResult<Store> {
        let record_id = to_record_id(STORE_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.upi_id.is_some() {
            set_parts.push("upi_id = $upi_id");
        }
        if data.upi_payee_name.is_some() {
            set_parts.push("upi_payee_name = $upi_payee_name");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", record_id));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.upi_id {
            query = query.bind(("upi_id", v));
        }
        if let Some(v) = data.upi_payee_name {
            query = query.bind(("upi_payee_name", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let stores: Vec<Store> = result.take(0)?;
        stores
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> StoreRepository {
        let service = DbService::memory().await.expect("mem db");
        StoreRepository::new(service.db)
    }

    fn new_store(name: &str) -> StoreCreate {
        StoreCreate {
            name: name.to_string(),
            description: None,
            upi_id: "canteen@upi".to_string(),
            upi_payee_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_payee_name_to_store_name() {
        let repo = repo().await;
        let store = repo.create("user:v1", new_store("North Mess")).await.unwrap();
        assert_eq!(store.upi_payee_name, "North Mess");
        assert!(store.is_active);
        assert_eq!(store.owner.to_string(), "user:v1");
    }

    #[tokio::test]
    async fn test_find_by_owner_and_deactivate() {
        let repo = repo().await;
        let store = repo.create("user:v1", new_store("Juice Corner")).await.unwrap();
        let id = store.id.unwrap().to_string();

        let owned = repo.find_by_owner("user:v1").await.unwrap();
        assert_eq!(owned.len(), 1);

        let updated = repo
            .update(
                &id,
                StoreUpdate {
                    name: None,
                    description: None,
                    upi_id: None,
                    upi_payee_name: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);

        let active = repo.find_all_active().await.unwrap();
        assert!(active.is_empty());
    }
}
