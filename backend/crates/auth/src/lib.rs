//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the token issuer
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Registration with email verification token
//! - Login returning a short-lived session token (HS512 JWT)
//! - Refresh tokens in an HTTP-only cookie, rotated on every use
//!
//! ## Security Model
//! - Passwords stored as salted HMAC-SHA512 (hash and salt side by side)
//! - Constant-time comparison of hashes and refresh tokens
//! - Refresh rotation is compare-and-swap: a token redeems at most once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_token::TokenIssuer;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgAuthRepository};
pub use presentation::middleware::{CurrentUser, optional_bearer, require_bearer};
pub use presentation::router::{auth_router, auth_router_generic, auth_router_with_state};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
