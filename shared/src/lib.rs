//! Shared types for the Tiffin campus ordering service
//!
//! Common types used by the server and by API clients: the response
//! envelope, auth DTOs, and the order/payment status enums.

pub mod client;
pub mod order;
pub mod response;
pub mod util;

// Re-exports
pub use order::{OrderStatus, PaymentStatus};
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
