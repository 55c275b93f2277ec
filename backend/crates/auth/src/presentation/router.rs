//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_bearer;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    auth_router_with_state(AuthAppState::new(repo, config))
}

/// Create the Auth router from prepared state
///
/// Use this when the token issuer must be shared with other routers.
pub fn auth_router_with_state<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/GetCurrentUser", get(handlers::get_current_user::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.issuer.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/Register", post(handlers::register::<R>))
        .route("/Login", post(handlers::login::<R>))
        .route("/Verify", post(handlers::verify::<R>))
        .route("/RefreshToken", post(handlers::refresh_token::<R>))
        .route("/Logout", post(handlers::logout::<R>))
        .merge(protected)
        .with_state(state)
}
