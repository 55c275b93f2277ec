//! Auth Error Types
//!
//! Business failures (`EmailInUse` .. `Unauthenticated`) are *reported*:
//! they render as the response envelope with `success = false`.
//! Configuration, database and internal failures are fatal and render
//! through the unified `kernel::error::AppError` problem body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::response::ServiceResponse;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email is already in use")]
    EmailInUse,

    #[error("User name is already taken")]
    UserNameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("User is not verified")]
    NotVerified,

    /// Verification token unknown or already consumed
    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredToken,

    /// Missing or invalid bearer token
    #[error("Authentication required")]
    Unauthenticated,

    /// Input failed value-object validation
    #[error("{0}")]
    Validation(String),

    /// Deployment defect (e.g. signing secret missing)
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailInUse | AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::WrongPassword
            | AuthError::InvalidOrExpiredToken
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::NotVerified => ErrorKind::Forbidden,
            AuthError::InvalidToken | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Configuration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Whether this failure is reported in the envelope rather than raised
    pub fn is_reported(&self) -> bool {
        !matches!(
            self,
            AuthError::Configuration(_) | AuthError::Database(_) | AuthError::Internal(_)
        )
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Configuration(msg) => {
                tracing::error!(message = %msg, "Auth configuration error");
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::WrongPassword => {
                tracing::warn!("Login attempt with wrong password");
            }
            AuthError::InvalidOrExpiredToken => {
                tracing::warn!("Refresh attempted with invalid or expired token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        if !self.is_reported() {
            return self.to_app_error().into_response();
        }

        let status = StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::BAD_REQUEST);
        let body = ServiceResponse::<()>::failure(self.to_string());

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err.message().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_reported() {
        for err in [
            AuthError::EmailInUse,
            AuthError::UserNotFound,
            AuthError::WrongPassword,
            AuthError::NotVerified,
            AuthError::InvalidToken,
            AuthError::InvalidOrExpiredToken,
        ] {
            assert!(err.is_reported(), "{err} should be reported");
        }
        assert!(!AuthError::Configuration("missing".into()).is_reported());
        assert!(!AuthError::Internal("boom".into()).is_reported());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::EmailInUse.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::UserNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AuthError::NotVerified.kind(), ErrorKind::Forbidden);
        assert_eq!(
            AuthError::Configuration("x".into()).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_from_app_error() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));

        let err: AuthError = AppError::internal("boom").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn test_reported_error_renders_envelope() {
        let response = AuthError::WrongPassword.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["returnMessage"], "Wrong password");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_configuration_error_renders_problem() {
        let response = AuthError::Configuration("JWT secret missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 500);
        assert!(body.get("success").is_none());
    }
}
