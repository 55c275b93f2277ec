//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use kernel::response::ServiceResponse;
use platform::cookie::to_header_value;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshSessionUseCase,
    RegisterInput, RegisterUseCase, TokenIssuer, VerifyUseCase,
};
use crate::domain::entity::RefreshToken;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, RegisterRequest, UserDto, VerifyRequest};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub issuer: Arc<TokenIssuer>,
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let config = Arc::new(config);
        Self {
            repo: Arc::new(repo),
            issuer: Arc::new(TokenIssuer::new(config.clone())),
            config,
        }
    }
}

// ============================================================================
// Register / Verify
// ============================================================================

/// POST /api/Auth/Register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<ServiceResponse<i64>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone());

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            user_name: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    // No mailer is wired up; the token is only reachable through the logs.
    tracing::debug!(
        user_id = %output.user_id,
        verification_token = output.verification_token.as_str(),
        "Verification token issued"
    );

    Ok(Json(ServiceResponse::success(
        output.user_id.value(),
        "User registered. Check your email to verify the account.",
    )))
}

/// POST /api/Auth/Verify
pub async fn verify<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<VerifyRequest>,
) -> AuthResult<Json<ServiceResponse<()>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    VerifyUseCase::new(state.repo.clone())
        .execute(&req.token)
        .await?;

    Ok(Json(ServiceResponse::message("User verified")))
}

// ============================================================================
// Login / Refresh / Logout
// ============================================================================

/// POST /api/Auth/Login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.issuer.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = refresh_cookie(&state.config, &output.refresh_token)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ServiceResponse::success(output.session_token, "Logged in")),
    ))
}

/// POST /api/Auth/RefreshToken
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    let presented = jar
        .get(&state.config.refresh_cookie_name)
        .map(|c| c.value().to_string())
        .ok_or(AuthError::InvalidOrExpiredToken)?;

    let use_case = RefreshSessionUseCase::new(state.repo.clone(), state.issuer.clone());
    let output = use_case.execute(&presented).await?;

    let cookie = refresh_cookie(&state.config, &output.refresh_token)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ServiceResponse::success(
            output.session_token,
            "Session refreshed",
        )),
    ))
}

/// POST /api/Auth/Logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    let presented = jar
        .get(&state.config.refresh_cookie_name)
        .map(|c| c.value().to_string());

    LogoutUseCase::new(state.repo.clone())
        .execute(presented.as_deref())
        .await?;

    let cookie = to_header_value(&state.config.refresh_cookie().build_delete_cookie())
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ServiceResponse::message("Logged out")),
    ))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/Auth/GetCurrentUser
pub async fn get_current_user<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> AuthResult<Json<ServiceResponse<UserDto>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(current.user_id)
        .await?;

    Ok(Json(ServiceResponse::success(UserDto::from(&user), "Current user")))
}

/// Build the `Set-Cookie` value binding a refresh token to the client
///
/// Max-Age is anchored on the token's creation so the cookie lives exactly
/// as long as the stored token.
fn refresh_cookie(config: &AuthConfig, token: &RefreshToken) -> AuthResult<HeaderValue> {
    let cookie = config
        .refresh_cookie()
        .build_set_cookie(&token.token, token.expires_at, token.created_at);

    to_header_value(&cookie).map_err(|e| AuthError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_refresh_cookie_matches_token_lifetime() {
        let config = AuthConfig::development();
        let token = RefreshToken::generate(
            Utc::now() - Duration::milliseconds(1500),
            config.refresh_token_lifetime(),
        );

        let cookie = refresh_cookie(&config, &token).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("refreshToken={}", token.token)));
        assert!(cookie.contains("Max-Age=86400"));
    }
}
