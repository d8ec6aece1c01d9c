//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// Account roles
pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_VENDOR: &str = "vendor";
pub const ROLE_ADMIN: &str = "admin";

/// User model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub phone: Option<String>,
    /// Customer-reliability fields; carried on the record, not enforced here.
    #[serde(default = "default_trust_tier")]
    pub trust_tier: String,
    #[serde(default)]
    pub no_show_count: i32,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

fn default_trust_tier() -> String {
    "regular".to_string()
}

/// Create user payload (internal, password already hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Profile update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Convert to the client-facing user info DTO
    pub fn to_user_info(&self) -> shared::client::UserInfo {
        shared::client::UserInfo {
            id: self.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = User::hash_password("hunter2hunter2").expect("hash");
        let user = User {
            id: None,
            username: "asha".into(),
            email: "asha@campus.edu".into(),
            password_hash: hash,
            display_name: "Asha".into(),
            role: ROLE_CUSTOMER.into(),
            phone: None,
            trust_tier: "regular".into(),
            no_show_count: 0,
            is_active: true,
            created_at: 0,
        };

        assert!(user.verify_password("hunter2hunter2").unwrap());
        assert!(!user.verify_password("wrong-password").unwrap());
    }
}
