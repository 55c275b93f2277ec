//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{CurrentUser, optional_bearer, require_bearer};
pub use router::{auth_router, auth_router_generic, auth_router_with_state};
