//! Infrastructure Layer
//!
//! PostgreSQL and in-memory repositories, and the Cloudinary photo host.

pub mod cloudinary;
pub mod memory;
pub mod postgres;

pub use cloudinary::{CloudinaryConfig, CloudinaryPhotoService};
pub use memory::InMemorySocialRepository;
pub use postgres::PgSocialRepository;
