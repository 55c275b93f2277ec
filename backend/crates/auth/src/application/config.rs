//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_token_base64;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric key for signing session tokens (`JWT_SECRET`)
    ///
    /// Optional at start-up; issuing a token without it is a configuration error.
    pub token_key: Option<String>,
    /// Session token lifetime (10 minutes)
    pub session_token_ttl: Duration,
    /// Refresh token lifetime (24 hours)
    pub refresh_token_ttl: Duration,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: None,
            session_token_ttl: Duration::from_secs(10 * 60),
            refresh_token_ttl: Duration::from_secs(24 * 3600),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Read `JWT_SECRET` and `COOKIE_SECURE` from the environment
    pub fn from_env() -> Self {
        let token_key = std::env::var("JWT_SECRET")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .ok()
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(!cfg!(debug_assertions));

        Self {
            token_key,
            cookie_secure,
            ..Default::default()
        }
    }

    /// Create config with a random signing key (for development and tests)
    pub fn with_random_secret() -> Self {
        Self {
            token_key: Some(random_token_base64(64)),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn session_token_lifetime(&self) -> chrono::Duration {
        to_chrono(self.session_token_ttl)
    }

    pub fn refresh_token_lifetime(&self) -> chrono::Duration {
        to_chrono(self.refresh_token_ttl)
    }

    /// Cookie settings for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_key", &self.token_key.as_ref().map(|_| "[REDACTED]"))
            .field("session_token_ttl", &self.session_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

fn to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert!(config.token_key.is_none());
        assert_eq!(config.session_token_lifetime(), chrono::Duration::minutes(10));
        assert_eq!(config.refresh_token_lifetime(), chrono::Duration::hours(24));
        assert_eq!(config.refresh_cookie_name, "refreshToken");
    }

    #[test]
    fn test_development() {
        let config = AuthConfig::development();
        assert!(config.token_key.is_some());
        assert!(!config.cookie_secure);
        assert!(!config.refresh_cookie().secure);
        assert!(config.refresh_cookie().http_only);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AuthConfig {
            token_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
