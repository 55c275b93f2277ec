//! Domain Layer
//!
//! Entities, value objects, repository traits and the photo host interface.

pub mod entities;
pub mod photo;
pub mod repository;
pub mod value_objects;

pub use entities::{Album, AlbumPhoto, FollowEntry, NewAlbum, Profile, UserSummary};
pub use photo::{DeletionResult, PhotoError, PhotoService, PhotoUpload, UploadResult};
pub use repository::{AlbumRepository, ProfileRepository};
pub use value_objects::{AlbumDetails, Page};
