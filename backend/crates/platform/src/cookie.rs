//! Cookie Management Infrastructure
//!
//! Builds `Set-Cookie` header values. Reading cookies is left to the
//! extractor layer.

use axum::http::HeaderValue;
use chrono::{DateTime, Utc};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    /// Build a `Set-Cookie` value that expires at `expires_at`
    ///
    /// Emits both `Expires` and `Max-Age`; `now` anchors the latter.
    pub fn build_set_cookie(
        &self,
        value: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> String {
        let max_age = (expires_at - now).num_seconds().max(0);

        let mut cookie = format!("{}={}", self.name, value);
        self.push_attributes(&mut cookie);
        cookie.push_str(&format!("; Expires={}", format_http_date(expires_at)));
        cookie.push_str(&format!("; Max-Age={}", max_age));
        cookie
    }

    /// Build a `Set-Cookie` value that deletes the cookie
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.push_attributes(&mut cookie);
        cookie.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0");
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
    }
}

/// RFC 7231 IMF-fixdate
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Convert a cookie string into a header value
///
/// Cookie values are base64 or hex, so this only fails on a programming error.
pub fn to_header_value(cookie: &str) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
    HeaderValue::from_str(cookie)
}
