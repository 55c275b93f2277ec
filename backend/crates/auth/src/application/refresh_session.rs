//! Refresh Session Use Case
//!
//! Exchanges a valid refresh token for a new session token and rotates
//! the refresh token. Rotation is a compare-and-swap on the stored value,
//! so a token can be redeemed at most once.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::login::SessionOutput;
use crate::application::session_token::TokenIssuer;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    issuer: Arc<TokenIssuer>,
}

impl<U> RefreshSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, issuer: Arc<TokenIssuer>) -> Self {
        Self { user_repo, issuer }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<SessionOutput> {
        self.execute_at(refresh_token, Utc::now()).await
    }

    /// Same as `execute`, evaluated at `now`
    pub async fn execute_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<SessionOutput> {
        if refresh_token.is_empty() {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let user = self
            .user_repo
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if !user.has_valid_refresh_token(refresh_token, now) {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let session_token =
            self.issuer
                .issue_session_token(user.user_id, user.user_name.original(), now)?;

        let next = self.issuer.issue_refresh_token(now);
        let rotated = self
            .user_repo
            .rotate_refresh_token(user.user_id, refresh_token, &next)
            .await?;

        if !rotated {
            tracing::warn!(user_id = %user.user_id, "Refresh token already rotated by a concurrent request");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        tracing::debug!(user_id = %user.user_id, "Session refreshed");

        Ok(SessionOutput {
            user_id: user.user_id,
            session_token,
            refresh_token: next,
        })
    }
}
