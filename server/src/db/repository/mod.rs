//! Repository Module
//!
//! CRUD operations over the SurrealDB tables. Foreign references are
//! stored as "table:id" strings, so lookups bind plain strings; record
//! primary keys bind native `RecordId`s.

pub mod menu_item;
pub mod order;
pub mod store;
pub mod user;

pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use store::StoreRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations read "Database index `x` already contains ..."
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an id that may or may not carry its "table:" prefix
pub fn to_record_id(table: &str, id: &str) -> RecordId {
    if id.contains(':') {
        id.parse::<RecordId>()
            .unwrap_or_else(|_| RecordId::from_table_key(table, id))
    } else {
        RecordId::from_table_key(table, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_record_id_accepts_both_forms() {
        assert_eq!(to_record_id("store", "store:abc").to_string(), "store:abc");
        assert_eq!(to_record_id("store", "abc").to_string(), "store:abc");
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate() {
        let err = RepoError::from(surrealdb::Error::Api(surrealdb::error::Api::Query(
            "Database index `uniq_order_number` already contains 'ORD202608051A2B'".into(),
        )));
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
