//! Social Error Types
//!
//! Same split as the auth errors: business failures render as the
//! envelope with `success = false`; database, internal and photo-host
//! configuration failures are fatal.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::response::ServiceResponse;
use thiserror::Error;

use crate::domain::photo::PhotoError;

pub type SocialResult<T> = Result<T, SocialError>;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Album not found")]
    AlbumNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Only the album owner can do that")]
    NotAlbumOwner,

    #[error("Album already liked")]
    AlreadyLiked,

    #[error("Album not liked")]
    NotLiked,

    #[error("Already following this user")]
    AlreadyFollowing,

    #[error("Not following this user")]
    NotFollowing,

    #[error("You cannot follow yourself")]
    CannotFollowSelf,

    #[error("Multipart field 'file' is required")]
    MissingFile,

    #[error("Album has no photo")]
    NoAlbumPhoto,

    #[error("{0}")]
    Validation(String),

    /// Photo host failure, propagated as reported by the provider
    #[error(transparent)]
    Photo(#[from] PhotoError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SocialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::AlbumNotFound | SocialError::UserNotFound => ErrorKind::NotFound,
            SocialError::NotAlbumOwner => ErrorKind::Forbidden,
            SocialError::AlreadyLiked | SocialError::AlreadyFollowing => ErrorKind::Conflict,
            SocialError::NotLiked | SocialError::NotFollowing | SocialError::NoAlbumPhoto => {
                ErrorKind::NotFound
            }
            SocialError::CannotFollowSelf
            | SocialError::MissingFile
            | SocialError::Validation(_) => ErrorKind::BadRequest,
            SocialError::Photo(PhotoError::Configuration(_)) => ErrorKind::InternalServerError,
            SocialError::Photo(_) => ErrorKind::BadGateway,
            SocialError::Database(_) | SocialError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether this failure is reported in the envelope rather than raised
    pub fn is_reported(&self) -> bool {
        !matches!(
            self,
            SocialError::Photo(PhotoError::Configuration(_))
                | SocialError::Database(_)
                | SocialError::Internal(_)
        )
    }

    fn log(&self) {
        match self {
            SocialError::Database(e) => {
                tracing::error!(error = %e, "Social database error");
            }
            SocialError::Internal(msg) => {
                tracing::error!(message = %msg, "Social internal error");
            }
            SocialError::Photo(PhotoError::Configuration(msg)) => {
                tracing::error!(message = %msg, "Photo host is not configured");
            }
            SocialError::Photo(e) => {
                tracing::warn!(error = %e, "Photo host request failed");
            }
            SocialError::NotAlbumOwner => {
                tracing::warn!("Album mutation attempted by non-owner");
            }
            _ => {
                tracing::debug!(error = %self, "Social error");
            }
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        self.log();

        if !self.is_reported() {
            return AppError::new(self.kind(), self.to_string()).into_response();
        }

        let status = StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::BAD_REQUEST);

        (status, Json(ServiceResponse::<()>::failure(self.to_string()))).into_response()
    }
}

impl From<AppError> for SocialError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            SocialError::Internal(err.to_string())
        } else {
            SocialError::Validation(err.message().to_string())
        }
    }
}
