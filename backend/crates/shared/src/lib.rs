//! Shared Kernel
//!
//! Vocabulary used by the auth and social contexts and the client shim:
//! - `ErrorKind` / `AppError` with RFC 7807 rendering (feature `axum`)
//! - Typed numeric identifiers (`UserId`, `AlbumId`)
//! - The `{success, returnMessage, data}` response envelope

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
