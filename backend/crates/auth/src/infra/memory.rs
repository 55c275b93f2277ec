//! In-Memory Repository Implementation
//!
//! Same contract as the PostgreSQL store, held behind an async lock.
//! Used by tests and local runs without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::{NewUser, RefreshToken, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    users: BTreeMap<i64, User>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a stored user (test setup)
    pub async fn put(&self, user: User) {
        let mut state = self.state.write().await;
        state.last_id = state.last_id.max(user.user_id.value());
        state.users.insert(user.user_id.value(), user);
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> AuthResult<UserId> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailInUse);
        }
        if state
            .users
            .values()
            .any(|u| u.user_name.canonical() == user.user_name.canonical())
        {
            return Err(AuthError::UserNameTaken);
        }

        state.last_id += 1;
        let user_id = UserId::from_i64(state.last_id);
        state.users.insert(user_id.value(), user.into_user(user_id));

        Ok(user_id)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id.value()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| &u.email == email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .any(|u| u.user_name.canonical() == user_name.canonical()))
    }

    async fn find_by_verification_token(&self, token: &str) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| {
                u.verification_token
                    .as_ref()
                    .is_some_and(|t| t.as_str() == token)
            })
            .cloned())
    }

    async fn mark_verified(
        &self,
        user_id: UserId,
        token: &str,
        verified_at: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&user_id.value()) else {
            return Ok(false);
        };

        let pending = user
            .verification_token
            .as_ref()
            .is_some_and(|t| t.as_str() == token);
        if !pending {
            return Ok(false);
        }

        user.verified_at = Some(verified_at);
        user.verification_token = None;
        Ok(true)
    }

    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.refresh_token.as_ref().is_some_and(|t| t.token == token))
            .cloned())
    }

    async fn store_refresh_token(&self, user_id: UserId, token: &RefreshToken) -> AuthResult<()> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(&user_id.value()) {
            user.refresh_token = Some(token.clone());
        }
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: UserId,
        current: &str,
        next: &RefreshToken,
    ) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&user_id.value()) else {
            return Ok(false);
        };

        if user.refresh_token.as_ref().is_some_and(|t| t.token == current) {
            user.refresh_token = Some(next.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn clear_refresh_token(&self, user_id: UserId, current: &str) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&user_id.value()) else {
            return Ok(false);
        };

        if user.refresh_token.as_ref().is_some_and(|t| t.token == current) {
            user.refresh_token = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_expired_refresh_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut state = self.state.write().await;
        let mut cleared = 0;
        for user in state.users.values_mut() {
            if user.refresh_token.as_ref().is_some_and(|t| t.is_expired_at(now)) {
                user.refresh_token = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}
