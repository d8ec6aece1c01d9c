//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - registration, login, current user
//! - [`profile`] - profile read/update
//! - [`stores`] - store management and menus
//! - [`menu_items`] - menu item management
//! - [`orders`] - order lifecycle

pub mod auth;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod profile;
pub mod stores;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok};
