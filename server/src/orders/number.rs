//! Order number generation
//!
//! Human-readable identifier, distinct from the record id:
//! `ORD` + 8-digit date + 4 random uppercase hex characters, e.g.
//! `ORD202608053F9A`. Collisions are not checked here; the unique index on
//! the order table surfaces them as a conflict.

use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};

use crate::utils::AppError;

const PREFIX: &str = "ORD";

/// Generate an order number for the given moment.
pub fn generate(now: DateTime<Utc>) -> Result<String, AppError> {
    let mut buf = [0u8; 2];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| AppError::internal("Failed to generate order number suffix"))?;
    let suffix = hex::encode_upper(buf);
    Ok(format!("{}{}{}", PREFIX, now.format("%Y%m%d"), suffix))
}
