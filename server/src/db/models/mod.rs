//! Database models

pub mod menu_item;
pub mod order;
pub mod serde_helpers;
pub mod store;
pub mod user;

pub use menu_item::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
pub use order::{
    CartItemRequest, Order, OrderCreateRequest, OrderId, OrderItemLine, OrderPollStatus,
    OrderStatusRequest, PaymentStatusRequest, VerifyOtpRequest,
};
pub use store::{Store, StoreCreate, StoreId, StoreUpdate};
pub use user::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_VENDOR, User, UserCreate, UserId, UserProfileUpdate};
