//! Refresh Token Entity
//!
//! Long-lived opaque credential bound to exactly one user. Stored alongside
//! the user row; rotation replaces it wholesale.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{constant_time_eq, random_token_base64};
use std::fmt;

/// Refresh token entropy in bytes (512 bits)
pub const REFRESH_TOKEN_BYTES: usize = 64;

#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Draw a fresh token valid for `ttl` from `now`
    pub fn generate(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token: random_token_base64(REFRESH_TOKEN_BYTES),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Expiry equal to `now` counts as expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq(self.token.as_bytes(), presented.as_bytes())
    }

    /// Presented value matches and has not expired
    pub fn is_valid_for(&self, presented: &str, now: DateTime<Utc>) -> bool {
        self.matches(presented) && !self.is_expired_at(now)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("token", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::from_base64;

    #[test]
    fn test_generate() {
        let now = Utc::now();
        let token = RefreshToken::generate(now, Duration::hours(24));
        assert_eq!(from_base64(&token.token).unwrap().len(), REFRESH_TOKEN_BYTES);
        assert_eq!(token.expires_at - token.created_at, Duration::hours(24));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = RefreshToken::generate(now, Duration::hours(24));

        assert!(token.is_valid_for(&token.token, now));
        assert!(token.is_valid_for(&token.token, token.expires_at - Duration::milliseconds(1)));
        assert!(!token.is_valid_for(&token.token, token.expires_at));
        assert!(!token.is_valid_for(&token.token, token.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_mismatch() {
        let token = RefreshToken::generate(Utc::now(), Duration::hours(1));
        assert!(!token.matches("not-the-token"));
        assert!(!token.matches(""));
    }
}
