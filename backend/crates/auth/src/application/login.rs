//! Login Use Case
//!
//! Checks run in a fixed order and stop at the first failure:
//! existence, then password, then verification.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::application::session_token::TokenIssuer;
use crate::domain::entity::RefreshToken;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Tokens handed back on login and refresh
#[derive(Debug)]
pub struct SessionOutput {
    pub user_id: UserId,
    pub session_token: String,
    pub refresh_token: RefreshToken,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    issuer: Arc<TokenIssuer>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, issuer: Arc<TokenIssuer>) -> Self {
        Self { user_repo, issuer }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<SessionOutput> {
        // A malformed address cannot belong to any account
        let email = Email::new(&input.email).map_err(|_| AuthError::UserNotFound)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let raw_password = RawPassword::new(input.password).map_err(|_| AuthError::WrongPassword)?;
        if !user.password.verify(&raw_password) {
            return Err(AuthError::WrongPassword);
        }

        if !user.is_verified() {
            return Err(AuthError::NotVerified);
        }

        let now = Utc::now();
        let session_token =
            self.issuer
                .issue_session_token(user.user_id, user.user_name.original(), now)?;

        let refresh_token = self.issuer.issue_refresh_token(now);
        self.user_repo
            .store_refresh_token(user.user_id, &refresh_token)
            .await?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(SessionOutput {
            user_id: user.user_id,
            session_token,
            refresh_token,
        })
    }
}
