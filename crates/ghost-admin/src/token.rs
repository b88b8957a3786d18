//! Admin API token signing
//!
//! An admin key has the form `<key id>:<hex secret>`. Each request carries a
//! short-lived HS256 JWT whose header names the key id and whose signature
//! uses the decoded secret bytes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Audience expected by the Admin API
pub const ADMIN_AUDIENCE: &str = "/admin/";

/// Token lifetime; the API rejects tokens valid for longer than five minutes
pub const TOKEN_TTL_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminClaims {
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

/// Parsed admin API key
#[derive(Clone)]
pub struct AdminKey {
    id: String,
    secret: Vec<u8>,
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl AdminKey {
    /// Parse `<id>:<hex secret>`.
    pub fn parse(raw: &str) -> Result<Self, BackendError> {
        let (id, secret) = raw
            .split_once(':')
            .ok_or_else(|| BackendError::InvalidApiKey("expected <id>:<secret>".to_string()))?;
        if id.is_empty() {
            return Err(BackendError::InvalidApiKey("empty key id".to_string()));
        }
        let secret = hex::decode(secret)
            .map_err(|e| BackendError::InvalidApiKey(format!("secret is not hex: {e}")))?;
        Ok(AdminKey {
            id: id.to_string(),
            secret,
        })
    }

    /// Sign a token valid from `now` for `TOKEN_TTL_SECS`.
    pub fn sign(&self, now: DateTime<Utc>) -> Result<String, BackendError> {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.id.clone());

        let claims = AdminClaims {
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
            aud: ADMIN_AUDIENCE.to_string(),
        };

        Ok(encode(
            &header,
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?)
    }
}
