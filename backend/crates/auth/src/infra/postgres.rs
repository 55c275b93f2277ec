//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;

use crate::domain::entity::{NewUser, RefreshToken, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserName, UserPassword, VerificationToken};
use crate::error::{AuthError, AuthResult};

const SELECT_USER: &str = r#"
    SELECT
        user_id,
        email,
        user_name,
        password_hash,
        password_salt,
        first_name,
        last_name,
        created_at,
        verified_at,
        verification_token,
        refresh_token,
        refresh_token_created_at,
        refresh_token_expires_at
    FROM users
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired refresh tokens (run at start-up)
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let cleared = self.delete_expired_refresh_tokens(Utc::now()).await?;

        tracing::info!(tokens_cleared = cleared, "Cleaned up expired refresh tokens");

        Ok(cleared)
    }

    async fn fetch_user(&self, predicate: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE {predicate} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }
}

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: NewUser) -> AuthResult<UserId> {
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                email,
                user_name,
                user_name_canonical,
                password_hash,
                password_salt,
                first_name,
                last_name,
                created_at,
                verification_token
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING user_id
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.password.hash())
        .bind(user.password.salt())
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.created_at)
        .bind(user.verification_token.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(&e).unwrap_or(AuthError::Database(e)))?;

        Ok(UserId::from_i64(user_id))
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.fetch_user("email", email.as_str()).await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_verification_token(&self, token: &str) -> AuthResult<Option<User>> {
        self.fetch_user("verification_token", token).await
    }

    async fn mark_verified(
        &self,
        user_id: UserId,
        token: &str,
        verified_at: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET verified_at = $3, verification_token = NULL
            WHERE user_id = $1 AND verification_token = $2
            "#,
        )
        .bind(user_id.value())
        .bind(token)
        .bind(verified_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>> {
        self.fetch_user("refresh_token", token).await
    }

    async fn store_refresh_token(&self, user_id: UserId, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $2,
                refresh_token_created_at = $3,
                refresh_token_expires_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .bind(&token.token)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: UserId,
        current: &str,
        next: &RefreshToken,
    ) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $3,
                refresh_token_created_at = $4,
                refresh_token_expires_at = $5
            WHERE user_id = $1 AND refresh_token = $2
            "#,
        )
        .bind(user_id.value())
        .bind(current)
        .bind(&next.token)
        .bind(next.created_at)
        .bind(next.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token(&self, user_id: UserId, current: &str) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = NULL,
                refresh_token_created_at = NULL,
                refresh_token_expires_at = NULL
            WHERE user_id = $1 AND refresh_token = $2
            "#,
        )
        .bind(user_id.value())
        .bind(current)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired_refresh_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = NULL,
                refresh_token_created_at = NULL,
                refresh_token_expires_at = NULL
            WHERE refresh_token_expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Map a lost registration race to the business error
fn unique_violation(err: &sqlx::Error) -> Option<AuthError> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    match db_err.constraint() {
        Some("users_email_key") => Some(AuthError::EmailInUse),
        Some("users_user_name_canonical_key") => Some(AuthError::UserNameTaken),
        _ => None,
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    email: String,
    user_name: String,
    password_hash: Vec<u8>,
    password_salt: Vec<u8>,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
    verification_token: Option<String>,
    refresh_token: Option<String>,
    refresh_token_created_at: Option<DateTime<Utc>>,
    refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_user(self) -> User {
        let refresh_token = match (
            self.refresh_token,
            self.refresh_token_created_at,
            self.refresh_token_expires_at,
        ) {
            (Some(token), Some(created_at), Some(expires_at)) => Some(RefreshToken {
                token,
                created_at,
                expires_at,
            }),
            _ => None,
        };

        User {
            user_id: UserId::from_i64(self.user_id),
            email: Email::from_db(self.email),
            user_name: UserName::from_db(self.user_name),
            password: UserPassword::from_db(self.password_hash, self.password_salt),
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
            verified_at: self.verified_at,
            verification_token: self.verification_token.map(VerificationToken::from_db),
            refresh_token,
        }
    }
}
