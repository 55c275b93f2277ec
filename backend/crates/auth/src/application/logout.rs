//! Logout Use Case
//!
//! Forgets the stored refresh token if the presented one is current.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct LogoutUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> LogoutUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Returns whether a stored token was cleared
    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<bool> {
        let Some(token) = refresh_token.filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        let Some(user) = self.user_repo.find_by_refresh_token(token).await? else {
            return Ok(false);
        };

        let cleared = self
            .user_repo
            .clear_refresh_token(user.user_id, token)
            .await?;

        if cleared {
            tracing::info!(user_id = %user.user_id, "User logged out");
        }

        Ok(cleared)
    }
}
