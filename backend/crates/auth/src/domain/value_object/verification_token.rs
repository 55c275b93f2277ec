//! Email verification token
//!
//! 512 random bits rendered as upper-case hex. Single-use: consumed when
//! the account is marked verified.

use platform::crypto::random_token_hex;
use std::fmt;

/// Token entropy in bytes
pub const VERIFICATION_TOKEN_BYTES: usize = 64;

#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn generate() -> Self {
        Self(random_token_hex(VERIFICATION_TOKEN_BYTES))
    }

    pub fn from_db(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerificationToken")
            .field(&"[REDACTED]")
            .finish()
    }
}
