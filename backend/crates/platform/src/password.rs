//! Password Hashing and Verification
//!
//! Salted keyed-hash password storage:
//! - A fresh 1024-bit salt from the CSPRNG for every hash
//! - HMAC-SHA512 of the UTF-8 password, keyed by the salt
//! - Constant-time verification
//! - Zeroization of the clear text on drop
//!
//! Hash and salt are stored side by side as binary columns.

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{hmac_sha512, random_bytes, verify_hmac_sha512};

/// Maximum password length in code points
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Salt length in bytes (matches the HMAC-SHA512 block size)
pub const SALT_LENGTH: usize = 128;

/// Hash length in bytes (HMAC-SHA512 output)
pub const HASH_LENGTH: usize = 64;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone`
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Unicode is normalized using NFKC before validation, so visually
    /// identical input hashes identically.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Create without validation (for testing or trusted input)
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password under a freshly generated salt
    pub fn hash(&self) -> HashedPassword {
        let salt = random_bytes(SALT_LENGTH);
        let hash = hmac_sha512(&salt, self.as_bytes()).to_vec();
        HashedPassword { hash, salt }
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Password hash plus the salt it was keyed with
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: Vec<u8>,
    salt: Vec<u8>,
}

impl HashedPassword {
    /// Rebuild from stored columns
    pub fn from_parts(hash: Vec<u8>, salt: Vec<u8>) -> Self {
        Self { hash, salt }
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Verify a password against this hash
    ///
    /// Recomputes under the stored salt; the tag comparison is constant-time.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        verify_hmac_sha512(&self.salt, password.as_bytes(), &self.hash)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .field("salt", &"[SALT]")
            .finish()
    }
}
