//! Verify Use Case
//!
//! Redeems a verification token. Tokens are single-use.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct VerifyUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> VerifyUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<UserId> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .user_repo
            .find_by_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !self
            .user_repo
            .mark_verified(user.user_id, token, Utc::now())
            .await?
        {
            return Err(AuthError::InvalidToken);
        }

        tracing::info!(user_id = %user.user_id, "User verified");

        Ok(user.user_id)
    }
}
