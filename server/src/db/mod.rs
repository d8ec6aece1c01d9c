//! Database Module
//!
//! Embedded SurrealDB connection plus the schema definitions applied at
//! startup. Uniqueness (usernames, emails, order numbers) lives here as
//! unique indexes; violations surface as `Conflict` to the API caller.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "tiffin";
const DATABASE: &str = "main";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        tracing::info!("Database ready at {db_path}");

        Ok(Self { db })
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        use surrealdb::engine::local::Mem;

        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Idempotent schema setup. Unique indexes carry the conflict semantics
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS uniq_user_username ON TABLE user FIELDS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS uniq_order_number ON TABLE order FIELDS order_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_order_user ON TABLE order FIELDS user;
        DEFINE INDEX IF NOT EXISTS idx_order_store ON TABLE order FIELDS store;
        DEFINE INDEX IF NOT EXISTS idx_menu_item_store ON TABLE menu_item FIELDS store;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_db_schema_applies() {
        let service = DbService::memory().await.expect("open mem db");
        // A second application must be a no-op (IF NOT EXISTS)
        define_schema(&service.db).await.expect("idempotent schema");
    }

    #[tokio::test]
    async fn test_rocksdb_opens_in_temp_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tiffin.db");
        let service = DbService::new(&path.to_string_lossy()).await.expect("open rocksdb");
        drop(service);
    }
}
