//! User Repository

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{User, UserCreate, UserProfileUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

/// Full record written at creation. The `User` model skips serializing the
/// password hash (API safety), so inserts go through this shape instead.
#[derive(Debug, Serialize)]
struct UserRecord {
    username: String,
    email: String,
    password_hash: String,
    display_name: String,
    role: String,
    phone: Option<String>,
    trust_tier: String,
    no_show_count: i32,
    is_active: bool,
    created_at: i64,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new user. Duplicate username/email surfaces as `Duplicate`
    /// via the unique indexes.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let record = UserRecord {
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            display_name: data.display_name,
            role: data.role,
            phone: data.phone,
            trust_tier: "regular".to_string(),
            no_show_count: 0,
            is_active: true,
            created_at: shared::util::now_millis(),
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = to_record_id(USER_TABLE, id);
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let user: Option<User> = result.take(0)?;
        Ok(user)
    }

    /// Update profile fields (display name, phone)
    pub async fn update_profile(&self, id: &str, data: UserProfileUpdate) -> RepoResult<User> {
        let record_id = to_record_id(USER_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.display_name.is_some() {
            set_parts.push("display_name = $display_name");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("id", record_id));
        if let Some(v) = data.display_name {
            query = query.bind(("display_name", v));
        }
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }

        let mut result = query.await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::ROLE_CUSTOMER;

    async fn repo() -> UserRepository {
        let service = DbService::memory().await.expect("mem db");
        UserRepository::new(service.db)
    }

    fn new_user(username: &str, email: &str) -> UserCreate {
        UserCreate {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            display_name: username.to_string(),
            role: ROLE_CUSTOMER.to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let created = repo.create(new_user("ravi", "ravi@campus.edu")).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.password_hash, "$argon2id$fake");

        let found = repo.find_by_username("ravi").await.unwrap().unwrap();
        assert_eq!(found.email, "ravi@campus.edu");
        assert!(found.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = repo().await;
        repo.create(new_user("meera", "meera@campus.edu")).await.unwrap();
        let err = repo
            .create(new_user("meera", "other@campus.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let repo = repo().await;
        let created = repo.create(new_user("dev", "dev@campus.edu")).await.unwrap();
        let id = created.id.unwrap().to_string();

        let updated = repo
            .update_profile(
                &id,
                UserProfileUpdate {
                    display_name: Some("Dev Patel".to_string()),
                    phone: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.display_name, "Dev Patel");
        assert_eq!(updated.email, "dev@campus.edu");
    }
}
