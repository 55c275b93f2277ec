//! Application Layer
//!
//! Use cases over the repository traits and the photo host.

pub mod albums;
pub mod follows;
pub mod likes;
pub mod photos;
pub mod profiles;

pub use albums::{CreateAlbumInput, CreateAlbumUseCase, DeleteAlbumUseCase, GetAlbumUseCase};
pub use follows::FollowUseCase;
pub use likes::LikeUseCase;
pub use photos::AlbumPhotoUseCase;
pub use profiles::ProfileUseCase;
