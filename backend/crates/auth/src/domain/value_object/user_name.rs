//! User Name Value Object
//!
//! ユーザー名はプロフィールやアルバムの所有者として表示される公開ハンドル。
//!
//! ## 設計方針
//! - NFKC正規化 → trim → 検証 の順で処理
//! - 表示用には入力の大文字小文字を保持し、一意性は小文字の canonical で判定
//!
//! ## 不変条件
//! - 長さ: 3〜32文字（正規化後）
//! - 使用可能文字: a-z, 0-9, `_`, `.`, `-`
//! - 先頭・末尾は英数字または `_`
//! - 予約語は使用不可

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 32;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Names that would collide with routes or impersonate staff
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "register",
    "verify",
    "album",
    "albums",
    "photo",
    "user",
    "users",
    "me",
    "null",
    "undefined",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be {min}-{max} characters (got {length})")]
    Length { length: usize, min: usize, max: usize },

    #[error("Invalid character '{0}'. Only a-z, 0-9, _, . and - are allowed")]
    InvalidCharacter(char),

    #[error("User name must start and end with a letter, digit or _")]
    InvalidBoundary,

    #[error("'{0}' is a reserved user name")]
    Reserved(String),
}

/// Validated user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original: String = input.as_ref().nfkc().collect::<String>().trim().to_string();
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Rebuild from the stored display form
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    /// Display form (case preserved)
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lower-case form used for uniqueness
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&length) {
            return Err(UserNameError::Length {
                length,
                min: USER_NAME_MIN_LENGTH,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if let Some(bad) = canonical.chars().find(|&c| !Self::is_valid_char(c)) {
            return Err(UserNameError::InvalidCharacter(bad));
        }

        let boundary_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !boundary_ok(canonical.chars().next()) || !boundary_ok(canonical.chars().next_back()) {
            return Err(UserNameError::InvalidBoundary);
        }

        if RESERVED_WORDS.contains(&canonical) {
            return Err(UserNameError::Reserved(canonical.to_string()));
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.original).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_preserved_canonical_lowered() {
        let name = UserName::new("  Alice_B  ").unwrap();
        assert_eq!(name.original(), "Alice_B");
        assert_eq!(name.canonical(), "alice_b");
        assert_eq!(name.to_string(), "Alice_B");
    }

    #[test]
    fn test_nfkc() {
        // Fullwidth "ａｌｉｃｅ"
        let name = UserName::new("\u{FF41}\u{FF4C}\u{FF49}\u{FF43}\u{FF45}").unwrap();
        assert_eq!(name.canonical(), "alice");
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(UserName::new("ab"), Err(UserNameError::Length { .. })));
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(matches!(
            UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
            Err(UserNameError::Length { .. })
        ));
        assert!(matches!(UserName::new("   "), Err(UserNameError::Empty)));
    }

    #[test]
    fn test_characters() {
        assert!(UserName::new("john.doe-99").is_ok());
        assert!(matches!(
            UserName::new("john doe"),
            Err(UserNameError::InvalidCharacter(' '))
        ));
        assert!(matches!(
            UserName::new("jöhn"),
            Err(UserNameError::InvalidCharacter('ö'))
        ));
        assert!(matches!(UserName::new(".john"), Err(UserNameError::InvalidBoundary)));
        assert!(matches!(UserName::new("john-"), Err(UserNameError::InvalidBoundary)));
        assert!(UserName::new("_john_").is_ok());
    }

    #[test]
    fn test_reserved() {
        assert!(matches!(UserName::new("Admin"), Err(UserNameError::Reserved(_))));
        assert!(UserName::new("admins").is_ok());
    }

    #[test]
    fn test_serde_roundtrip_uses_display_form() {
        let name = UserName::new("Alice").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Alice\"");
        let back: UserName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
        assert!(serde_json::from_str::<UserName>("\"a\"").is_err());
    }
}
