//! Auth Middleware
//!
//! Bearer-token authentication for protected routes.

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use kernel::id::UserId;
use std::convert::Infallible;
use std::sync::Arc;

use crate::application::session_token::TokenIssuer;
use crate::error::AuthError;

/// Caller identity established by [`require_bearer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_name: String,
}

/// Middleware that requires a valid `Authorization: Bearer` session token
///
/// On success the caller is available to handlers as a [`CurrentUser`].
pub async fn require_bearer(
    State(issuer): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthError::Unauthenticated)?;

    let claims = issuer.validate_session_token(bearer.token())?;
    let current = CurrentUser {
        user_id: claims.user_id()?,
        user_name: claims.name,
    };

    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}

/// Middleware that authenticates when a bearer token is present
///
/// Requests without `Authorization` pass through anonymously; a token that
/// fails validation is rejected. Handlers that need a caller extract
/// [`CurrentUser`], which rejects anonymous requests.
pub async fn optional_bearer(
    State(issuer): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if let Some(bearer) = req.headers().typed_get::<Authorization<Bearer>>() {
        let claims = issuer.validate_session_token(bearer.token())?;
        let current = CurrentUser {
            user_id: claims.user_id()?,
            user_name: claims.name,
        };
        req.extensions_mut().insert(current);
    }

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AuthConfig;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::{Router, middleware, routing::get};
    use chrono::Utc;
    use tower::ServiceExt;

    async fn whoami(current: Option<CurrentUser>) -> String {
        current.map(|c| c.user_name).unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(issuer: Arc<TokenIssuer>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(issuer, optional_bearer))
    }

    fn request(token: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_optional_bearer_anonymous() {
        let issuer = Arc::new(TokenIssuer::new(Arc::new(AuthConfig::development())));
        let response = app(issuer).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_optional_bearer_authenticated() {
        let issuer = Arc::new(TokenIssuer::new(Arc::new(AuthConfig::development())));
        let token = issuer
            .issue_session_token(UserId::from_i64(3), "carol", Utc::now())
            .unwrap();
        let response = app(issuer).oneshot(request(Some(&token))).await.unwrap();
        assert_eq!(text(response).await, "carol");
    }

    #[tokio::test]
    async fn test_optional_bearer_rejects_bad_token() {
        let issuer = Arc::new(TokenIssuer::new(Arc::new(AuthConfig::development())));
        let response = app(issuer).oneshot(request(Some("garbage"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
