//! Social Backend Module
//!
//! Albums, likes, follows and public profiles, layered like the auth crate:
//! - `domain/` - Entities, value objects, repository traits, photo host trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories, Cloudinary client
//! - `presentation/` - HTTP handlers, DTOs, mapping layer, router
//!
//! Callers are identified by the session token issued by the auth crate.
//! Album mutations are owner-only.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use domain::photo::{PhotoError, PhotoService};
pub use error::{SocialError, SocialResult};
pub use infra::{
    CloudinaryConfig, CloudinaryPhotoService, InMemorySocialRepository, PgSocialRepository,
};
pub use presentation::router::{social_router, social_router_generic};
