//! Tiffin Server - campus canteen ordering backend
//!
//! # Architecture overview
//!
//! - **HTTP API** (`api`): axum routers and handlers per resource
//! - **Database** (`db`): embedded SurrealDB, models, repositories
//! - **Auth** (`auth`): JWT + argon2, capability checks
//! - **Orders** (`orders`): pricing, OTP, order numbers
//! - **Payment** (`payment`): UPI deep-link formatting
//! - **Notifications** (`notify`): queued best-effort customer emails
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, HTTP server
//! ├── auth/          # JWT auth, capability checks
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer
//! ├── orders/        # order domain helpers
//! ├── payment/       # UPI links
//! ├── notify/        # outbound notification queue
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod payment;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - tracing with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
