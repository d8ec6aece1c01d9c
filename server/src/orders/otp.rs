//! Pickup OTP issue and verification
//!
//! A 6-digit code is minted when an order goes `ready` and checked when the
//! customer collects it. Verification returns a single yes/no: a missing
//! code, an expired code, and a mismatched code are indistinguishable to
//! the caller. There is no attempt limit on verification.

use ring::rand::{SecureRandom, SystemRandom};

use crate::utils::AppError;

/// Inclusive lower bound of the code range
const OTP_MIN: u32 = 100_000;
/// Number of possible codes (100000..=999999)
const OTP_SPAN: u32 = 900_000;
/// Codes expire 15 minutes after issuance
pub const OTP_TTL_MILLIS: i64 = 15 * 60 * 1000;

/// A freshly minted code with its expiry timestamp (unix millis)
#[derive(Debug, Clone)]
pub struct OtpIssue {
    pub code: String,
    pub expires_at: i64,
}

/// Mint a new 6-digit code, valid for 15 minutes from `now_millis`.
pub fn issue(now_millis: i64) -> Result<OtpIssue, AppError> {
    let code = OTP_MIN + random_below(&SystemRandom::new(), OTP_SPAN)?;
    Ok(OtpIssue {
        code: code.to_string(),
        expires_at: now_millis + OTP_TTL_MILLIS,
    })
}

/// Uniform random value in `0..span` via rejection sampling.
fn random_below(rng: &SystemRandom, span: u32) -> Result<u32, AppError> {
    let zone = u32::MAX - (u32::MAX % span);
    loop {
        let mut buf = [0u8; 4];
        rng.fill(&mut buf)
            .map_err(|_| AppError::internal("Failed to generate secure random OTP"))?;
        let value = u32::from_be_bytes(buf);
        if value < zone {
            return Ok(value % span);
        }
    }
}

/// Check a supplied code against the stored one.
///
/// Valid only when code and expiry are both present, `now_millis` has not
/// passed the expiry, and the strings match exactly. No normalization.
pub fn verify(
    stored: Option<&str>,
    supplied: &str,
    expires_at: Option<i64>,
    now_millis: i64,
) -> bool {
    let (Some(stored), Some(expires_at)) = (stored, expires_at) else {
        return false;
    };
    if supplied.is_empty() {
        return false;
    }
    if now_millis > expires_at {
        return false;
    }
    stored == supplied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_format_and_range() {
        for _ in 0..100 {
            let minted = issue(0).expect("mint");
            assert_eq!(minted.code.len(), 6);
            assert!(minted.code.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = minted.code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_expiry_is_exactly_fifteen_minutes() {
        let minted = issue(1_000_000).expect("mint");
        assert_eq!(minted.expires_at, 1_000_000 + 15 * 60 * 1000);
    }

    #[test]
    fn test_verify_roundtrip_within_window() {
        let now = 10_000;
        let minted = issue(now).expect("mint");

        // 14:59 after mint, still valid
        let at_1459 = now + 14 * 60 * 1000 + 59 * 1000;
        assert!(verify(Some(&minted.code), &minted.code, Some(minted.expires_at), at_1459));

        // 15:01 after mint, expired
        let at_1501 = now + 15 * 60 * 1000 + 1000;
        assert!(!verify(Some(&minted.code), &minted.code, Some(minted.expires_at), at_1501));
    }

    #[test]
    fn test_verify_requires_exact_match() {
        assert!(verify(Some("123456"), "123456", Some(100), 50));
        assert!(!verify(Some("123456"), "123457", Some(100), 50));
        // No normalization: whitespace and leading zeros matter
        assert!(!verify(Some("123456"), " 123456", Some(100), 50));
        assert!(!verify(Some("123456"), "0123456", Some(100), 50));
    }

    #[test]
    fn test_verify_rejects_missing_values() {
        assert!(!verify(None, "123456", Some(100), 50));
        assert!(!verify(Some("123456"), "123456", None, 50));
        assert!(!verify(Some("123456"), "", Some(100), 50));
    }
}
