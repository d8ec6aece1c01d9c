//! Payment helpers (UPI deep links)

pub mod upi;

pub use upi::{PaymentInfo, UpiAppLinks};
