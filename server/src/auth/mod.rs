//! Authentication and authorization
//!
//! JWT token service, router middleware, the `CurrentUser` extractor, and
//! the capability check used by mutating handlers.

mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use permissions::{Action, can, ensure};
