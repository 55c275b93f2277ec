//! Register Use Case
//!
//! Creates an unverified account and its verification token.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::entity::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword, UserName, UserPassword, VerificationToken};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
    /// To be delivered out of band; never returned to the caller
    pub verification_token: VerificationToken,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(&input.email)?;
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailInUse);
        }

        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let verification_token = VerificationToken::generate();

        let new_user = NewUser {
            email,
            user_name,
            password: UserPassword::from_raw(&raw_password),
            first_name: normalize_optional(input.first_name),
            last_name: normalize_optional(input.last_name),
            created_at: Utc::now(),
            verification_token: verification_token.clone(),
        };

        let user_id = self.user_repo.create(new_user).await?;

        tracing::info!(user_id = %user_id, "User registered");

        Ok(RegisterOutput {
            user_id,
            verification_token,
        })
    }
}

/// Trim and drop empty names
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
