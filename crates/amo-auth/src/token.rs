//! OAuth token model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::oauth::TokenResponse;

/// Seconds before expiry at which [`Token::needs_refresh`] turns true.
pub const REFRESH_LEEWAY_SECS: i64 = 60;

/// An access/refresh token pair with its absolute expiry.
///
/// Replaced wholesale on every exchange. Both secrets are redacted in Debug
/// output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    /// Create a bearer token.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }

    /// Build a token from a grant answer received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// Reject a token missing either secret.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "token has no access_token".to_string(),
            )));
        }
        if self.refresh_token.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "token has no refresh_token".to_string(),
            )));
        }
        Ok(())
    }

    /// True once `expires_at` has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// True within [`REFRESH_LEEWAY_SECS`] of expiry, or after it.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_LEEWAY_SECS) >= self.expires_at
    }
}
