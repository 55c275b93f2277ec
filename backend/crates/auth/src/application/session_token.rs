//! Session Token Issuer
//!
//! Short-lived HS512 JWTs carrying the user id and name, plus the
//! refresh tokens that outlive them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::RefreshToken;
use crate::error::{AuthError, AuthResult};

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    /// User name (display form)
    pub name: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> AuthResult<UserId> {
        self.sub.parse().map_err(|_| AuthError::Unauthenticated)
    }
}

/// Issues and validates session and refresh tokens
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: Arc<AuthConfig>,
}

impl TokenIssuer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    fn key(&self) -> AuthResult<&[u8]> {
        self.config
            .token_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(str::as_bytes)
            .ok_or_else(|| AuthError::Configuration("JWT signing secret is not set".to_string()))
    }

    /// Sign a session token valid from `now` for the configured lifetime
    pub fn issue_session_token(
        &self,
        user_id: UserId,
        user_name: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<String> {
        let key = self.key()?;
        let issued_at = now.timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            name: user_name.to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: (now + self.config.session_token_lifetime()).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(key),
        )
        .map_err(|e| AuthError::Internal(format!("failed to sign session token: {e}")))
    }

    /// Check signature, algorithm and expiry
    pub fn validate_session_token(&self, token: &str) -> AuthResult<SessionClaims> {
        let key = self.key()?;

        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        jsonwebtoken::decode::<SessionClaims>(token, &DecodingKey::from_secret(key), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AuthError::Unauthenticated
            })
    }

    /// Draw a new refresh token valid for the configured lifetime
    pub fn issue_refresh_token(&self, now: DateTime<Utc>) -> RefreshToken {
        RefreshToken::generate(now, self.config.refresh_token_lifetime())
    }
}
