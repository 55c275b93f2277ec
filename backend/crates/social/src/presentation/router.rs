//! Social Router

use std::sync::Arc;

use auth::{TokenIssuer, optional_bearer};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::domain::photo::PhotoService;
use crate::domain::repository::{AlbumRepository, ProfileRepository};
use crate::infra::cloudinary::CloudinaryPhotoService;
use crate::infra::postgres::PgSocialRepository;
use crate::presentation::handlers::{self, SocialAppState};

/// Upper bound for a cover image upload
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Create the Social router with PostgreSQL and Cloudinary
pub fn social_router(
    repo: PgSocialRepository,
    photos: CloudinaryPhotoService,
    issuer: Arc<TokenIssuer>,
) -> Router {
    social_router_generic(repo, photos, issuer)
}

/// Create a generic Social router for any repository and photo host
///
/// Every route runs behind [`optional_bearer`]; handlers that need a
/// caller extract `CurrentUser`, so anonymous requests reach only the
/// public reads.
pub fn social_router_generic<R, P>(repo: R, photos: P, issuer: Arc<TokenIssuer>) -> Router
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let state = SocialAppState::new(repo, photos);

    Router::new()
        .route(
            "/Album",
            get(handlers::list_albums::<R, P>).post(handlers::create_album::<R, P>),
        )
        .route(
            "/Album/{id}",
            get(handlers::get_album::<R, P>).delete(handlers::delete_album::<R, P>),
        )
        .route(
            "/Album/{id}/Photo",
            post(handlers::set_album_photo::<R, P>)
                .delete(handlers::delete_album_photo::<R, P>)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
        .route(
            "/Album/{id}/Like",
            post(handlers::like_album::<R, P>).delete(handlers::unlike_album::<R, P>),
        )
        .route("/User/{id}", get(handlers::get_profile::<R, P>))
        .route("/User/{id}/Followers", get(handlers::list_followers::<R, P>))
        .route("/User/{id}/Following", get(handlers::list_following::<R, P>))
        .route(
            "/User/{id}/Follow",
            post(handlers::follow_user::<R, P>).delete(handlers::unfollow_user::<R, P>),
        )
        .layer(middleware::from_fn_with_state(issuer, optional_bearer))
        .with_state(state)
}
