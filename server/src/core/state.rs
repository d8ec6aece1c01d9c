//! Server state
//!
//! `ServerState` holds the shared handles every handler needs: config, the
//! embedded database, the JWT service, and the notification queue. It is
//! constructed explicitly and injected through axum's `State`, so tests can
//! assemble one around an in-memory database and a capturing notifier.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{LogTransport, Notifier};

#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// JWT service (shared)
    pub jwt_service: Arc<JwtService>,
    /// Outbound notification queue
    pub notifier: Notifier,
}

impl ServerState {
    /// Assemble a state from parts (tests use this directly)
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            notifier,
        }
    }

    /// Initialize the production state:
    /// 1. work dir layout
    /// 2. on-disk database (work_dir/database/tiffin.db)
    /// 3. JWT service from config
    /// 4. notification queue with the log transport worker
    ///
    /// # Panics
    ///
    /// Panics when the work dir or database cannot be initialized.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("tiffin.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let notifier = Notifier::spawn(Arc::new(LogTransport));

        Self::new(config.clone(), db_service.db, jwt_service, notifier)
    }

    pub fn db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
