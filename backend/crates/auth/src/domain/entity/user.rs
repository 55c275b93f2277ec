//! User Entity
//!
//! A registered account: credentials, verification state and the single
//! active refresh token.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::value_object::{Email, UserName, UserPassword, VerificationToken};

/// Persisted user
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub user_name: UserName,
    pub password: UserPassword,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set once the verification token has been redeemed
    pub verified_at: Option<DateTime<Utc>>,
    /// Present until redeemed
    pub verification_token: Option<VerificationToken>,
    pub refresh_token: Option<RefreshToken>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Whether `presented` is this user's current, unexpired refresh token
    pub fn has_valid_refresh_token(&self, presented: &str, now: DateTime<Utc>) -> bool {
        self.refresh_token
            .as_ref()
            .is_some_and(|t| t.is_valid_for(presented, now))
    }
}

/// User about to be inserted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub user_name: UserName,
    pub password: UserPassword,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub verification_token: VerificationToken,
}

impl NewUser {
    /// Materialize with the id the store assigned
    pub fn into_user(self, user_id: UserId) -> User {
        User {
            user_id,
            email: self.email,
            user_name: self.user_name,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
            verified_at: None,
            verification_token: Some(self.verification_token),
            refresh_token: None,
        }
    }
}
