//! Social Value Objects
//!
//! Album fields are trimmed before validation; empty optional fields
//! collapse to `None`.

use chrono::{Datelike, Utc};
use kernel::error::app_error::{AppError, AppResult};

pub const TITLE_MAX_LENGTH: usize = 100;
pub const ARTIST_MAX_LENGTH: usize = 100;
pub const GENRE_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;
pub const EARLIEST_RELEASE_YEAR: i32 = 1900;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Validated album fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDetails {
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub description: Option<String>,
}

impl AlbumDetails {
    pub fn new(
        title: &str,
        artist: &str,
        genre: Option<&str>,
        release_year: Option<i32>,
        description: Option<&str>,
    ) -> AppResult<Self> {
        let title = required("Title", title, TITLE_MAX_LENGTH)?;
        let artist = required("Artist", artist, ARTIST_MAX_LENGTH)?;
        let genre = optional("Genre", genre, GENRE_MAX_LENGTH)?;
        let description = optional("Description", description, DESCRIPTION_MAX_LENGTH)?;

        if let Some(year) = release_year {
            let latest = Utc::now().year() + 1;
            if !(EARLIEST_RELEASE_YEAR..=latest).contains(&year) {
                return Err(AppError::bad_request(format!(
                    "Release year must be between {EARLIEST_RELEASE_YEAR} and {latest}"
                )));
            }
        }

        Ok(Self {
            title,
            artist,
            genre,
            release_year,
            description,
        })
    }

    /// Rebuild from stored columns
    pub fn from_db(
        title: String,
        artist: String,
        genre: Option<String>,
        release_year: Option<i32>,
        description: Option<String>,
    ) -> Self {
        Self {
            title,
            artist,
            genre,
            release_year,
            description,
        }
    }
}

fn required(field: &str, value: &str, max: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} cannot be empty")));
    }
    check_length(field, value, max)?;
    Ok(value.to_string())
}

fn optional(field: &str, value: Option<&str>, max: usize) -> AppResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            check_length(field, v, max)?;
            Ok(Some(v.to_string()))
        }
        None => Ok(None),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Offset pagination, newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Clamp the limit to `1..=MAX_PAGE_LIMIT` and the offset to `>= 0`
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_trimmed() {
        let details =
            AlbumDetails::new("  Kind of Blue ", " Miles Davis", Some("  "), None, Some(" x "))
                .unwrap();
        assert_eq!(details.title, "Kind of Blue");
        assert_eq!(details.artist, "Miles Davis");
        assert_eq!(details.genre, None);
        assert_eq!(details.description.as_deref(), Some("x"));
    }

    #[test]
    fn test_details_required_fields() {
        assert!(AlbumDetails::new("", "a", None, None, None).is_err());
        assert!(AlbumDetails::new("t", "   ", None, None, None).is_err());
    }

    #[test]
    fn test_details_lengths() {
        let long = "x".repeat(TITLE_MAX_LENGTH + 1);
        assert!(AlbumDetails::new(&long, "a", None, None, None).is_err());
        let ok = "x".repeat(TITLE_MAX_LENGTH);
        assert!(AlbumDetails::new(&ok, "a", None, None, None).is_ok());

        let description = "d".repeat(DESCRIPTION_MAX_LENGTH + 1);
        assert!(AlbumDetails::new("t", "a", None, None, Some(&description)).is_err());
    }

    #[test]
    fn test_release_year_range() {
        assert!(AlbumDetails::new("t", "a", None, Some(1959), None).is_ok());
        assert!(AlbumDetails::new("t", "a", None, Some(1899), None).is_err());
        assert!(AlbumDetails::new("t", "a", None, Some(Utc::now().year() + 2), None).is_err());
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(Page::default(), Page { limit: 20, offset: 0 });
        assert_eq!(Page::new(Some(500), Some(-3)), Page { limit: 100, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(40)), Page { limit: 1, offset: 40 });
    }
}
