//! User Password Value Object
//!
//! Domain wrapper over `platform::password`: maps policy violations to
//! user-facing errors and keeps the hash/salt pair together.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

/// Password as typed by the user; zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
                "Password must be at most {max} characters (got {actual})"
            ))
            .with_action("Please choose a shorter password"),

            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
                    .with_action("Please enter a password")
            }

            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Please remove any control characters")
            }
        })?;

        Ok(Self(clear_text))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored password: hash plus salt
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password under a fresh salt
    pub fn from_raw(raw: &RawPassword) -> Self {
        Self(raw.0.hash())
    }

    /// Rebuild from the `password_hash` / `password_salt` columns
    pub fn from_db(hash: Vec<u8>, salt: Vec<u8>) -> Self {
        Self(HashedPassword::from_parts(hash, salt))
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(&raw.0)
    }

    pub fn hash(&self) -> &[u8] {
        self.0.hash()
    }

    pub fn salt(&self) -> &[u8] {
        self.0.salt()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("pw1".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw);
        assert!(stored.verify(&raw));

        let other = RawPassword::new("pw2".to_string()).unwrap();
        assert!(!stored.verify(&other));
    }

    #[test]
    fn test_db_roundtrip() {
        let raw = RawPassword::new("correct horse".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw);
        let restored = UserPassword::from_db(stored.hash().to_vec(), stored.salt().to_vec());
        assert!(restored.verify(&raw));
    }

    #[test]
    fn test_policy_errors_are_bad_requests() {
        let err = RawPassword::new(String::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.action(), Some("Please enter a password"));

        let err = RawPassword::new("x".repeat(200)).unwrap_err();
        assert!(err.message().contains("at most"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let raw = RawPassword::new("hunter2".to_string()).unwrap();
        assert!(!format!("{raw:?}").contains("hunter2"));
        let stored = UserPassword::from_raw(&raw);
        assert_eq!(format!("{stored:?}"), "UserPassword(\"[HASH]\")");
    }
}
