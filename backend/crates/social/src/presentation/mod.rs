//! Presentation Layer
//!
//! HTTP handlers, DTOs, the mapping layer and the router.

pub mod dto;
pub mod handlers;
pub mod mapping;
pub mod router;

pub use handlers::SocialAppState;
pub use router::{social_router, social_router_generic};
