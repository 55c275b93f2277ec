//! HTTP Client Shim
//!
//! Typed async client for the album-sharing API. Holds the session token
//! in a shared slot and lets the cookie store carry the refresh token.

pub mod client;
pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use models::{AlbumDto, CreateAlbumRequest, FollowDto, ProfileDto, RegisterRequest, UserDto};
