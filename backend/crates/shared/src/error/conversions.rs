//! Error conversions
//!
//! Identifier parsing folds into validation errors; the axum rendering is
//! feature-gated so non-HTTP crates (the client shim) stay light.

use super::app_error::AppError;
use crate::id::IdParseError;

impl From<IdParseError> for AppError {
    fn from(err: IdParseError) -> Self {
        AppError::bad_request(err.to_string()).with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.to_problem())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_id_parse_error_conversion() {
        let parse_err = "abc".parse::<crate::id::UserId>().unwrap_err();
        let app_err: AppError = parse_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
        assert_eq!(app_err.message(), "Invalid identifier: abc");
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_problem_response() {
        use axum::response::IntoResponse;

        let response = AppError::internal("boom").into_response();
        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/problem+json"
        );
    }
}
