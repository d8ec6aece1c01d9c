//! Order lifecycle domain
//!
//! Pure building blocks for the order flow: pricing (snapshot totals),
//! pickup OTP issue/verify, and order number generation. The status chain
//! itself lives on [`shared::OrderStatus`]; handlers combine these pieces
//! with single-statement repository writes.
//!
//! Concurrency note: order mutations carry no version token. Two racing
//! transitions against the same order resolve by last write wins, and a second
//! "mark ready" can silently replace an earlier OTP.

pub mod number;
pub mod otp;
pub mod pricing;

pub use otp::{OTP_TTL_MILLIS, OtpIssue};
