//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the infra layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{NewUser, RefreshToken, User};
use crate::domain::value_object::{Email, UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user and return its assigned id
    ///
    /// Fails with `EmailInUse` / `UserNameTaken` if a concurrent insert won.
    async fn create(&self, user: NewUser) -> AuthResult<UserId>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Lookup by normalized (lower-case) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Lookup by canonical user name
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Find the user holding an unredeemed verification token
    async fn find_by_verification_token(&self, token: &str) -> AuthResult<Option<User>>;

    /// Mark verified and consume the token
    ///
    /// Returns `false` if the token was already consumed.
    async fn mark_verified(
        &self,
        user_id: UserId,
        token: &str,
        verified_at: DateTime<Utc>,
    ) -> AuthResult<bool>;

    /// Find the user whose stored refresh token equals `token`
    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>>;

    /// Overwrite the user's refresh token unconditionally (login)
    async fn store_refresh_token(&self, user_id: UserId, token: &RefreshToken) -> AuthResult<()>;

    /// Replace `current` with `next` only if `current` is still stored
    ///
    /// Returns `false` when another request rotated first.
    async fn rotate_refresh_token(
        &self,
        user_id: UserId,
        current: &str,
        next: &RefreshToken,
    ) -> AuthResult<bool>;

    /// Clear the refresh token if it still equals `current`
    async fn clear_refresh_token(&self, user_id: UserId, current: &str) -> AuthResult<bool>;

    /// Drop refresh tokens whose expiry is at or before `now`
    async fn delete_expired_refresh_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
