//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use kernel::error::app_error::AppError;
use kernel::id::{AlbumId, Id, UserId};
use kernel::response::ServiceResponse;

use crate::application::{
    AlbumPhotoUseCase, CreateAlbumInput, CreateAlbumUseCase, DeleteAlbumUseCase, FollowUseCase,
    GetAlbumUseCase, LikeUseCase, ProfileUseCase,
};
use crate::domain::photo::{DeletionResult, PhotoService, PhotoUpload, UploadResult};
use crate::domain::repository::{AlbumRepository, ProfileRepository};
use crate::domain::value_objects::Page;
use crate::error::{SocialError, SocialResult};
use crate::presentation::dto::{AlbumDto, CreateAlbumRequest, FollowDto, ListQuery, ProfileDto};
use crate::presentation::mapping::{albums_to_dtos, follows_to_dtos};

/// Multipart field carrying the cover image
pub const PHOTO_FIELD: &str = "file";

/// Shared state for social handlers
pub struct SocialAppState<R, P>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub photos: Arc<P>,
}

impl<R, P> Clone for SocialAppState<R, P>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            photos: self.photos.clone(),
        }
    }
}

impl<R, P> SocialAppState<R, P>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    pub fn new(repo: R, photos: P) -> Self {
        Self {
            repo: Arc::new(repo),
            photos: Arc::new(photos),
        }
    }
}

fn parse_id<T>(raw: &str) -> SocialResult<Id<T>> {
    Ok(raw.parse::<Id<T>>().map_err(AppError::from)?)
}

// ============================================================================
// Albums
// ============================================================================

/// GET /api/Album
pub async fn list_albums<R, P>(
    State(state): State<SocialAppState<R, P>>,
    Query(query): Query<ListQuery>,
) -> SocialResult<Json<ServiceResponse<Vec<AlbumDto>>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let page = Page::new(query.limit, query.offset);
    let albums = GetAlbumUseCase::new(state.repo.clone()).list(page).await?;

    Ok(Json(ServiceResponse::success(
        albums_to_dtos(&albums),
        "Albums",
    )))
}

/// POST /api/Album
pub async fn create_album<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Json(req): Json<CreateAlbumRequest>,
) -> SocialResult<Json<ServiceResponse<i64>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id = CreateAlbumUseCase::new(state.repo.clone())
        .execute(
            current.user_id,
            CreateAlbumInput {
                title: req.title,
                artist: req.artist,
                genre: req.genre,
                release_year: req.release_year,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(ServiceResponse::success(
        album_id.value(),
        "Album created",
    )))
}

/// GET /api/Album/{id}
pub async fn get_album<R, P>(
    State(state): State<SocialAppState<R, P>>,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<AlbumDto>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id: AlbumId = parse_id(&id)?;
    let album = GetAlbumUseCase::new(state.repo.clone())
        .execute(album_id)
        .await?;

    Ok(Json(ServiceResponse::success(AlbumDto::from(&album), "Album")))
}

/// DELETE /api/Album/{id}
pub async fn delete_album<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<()>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id: AlbumId = parse_id(&id)?;
    DeleteAlbumUseCase::new(state.repo.clone(), state.photos.clone())
        .execute(album_id, current.user_id)
        .await?;

    Ok(Json(ServiceResponse::message("Album deleted")))
}

// ============================================================================
// Album Photo
// ============================================================================

/// POST /api/Album/{id}/Photo
pub async fn set_album_photo<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> SocialResult<Json<ServiceResponse<UploadResult>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id: AlbumId = parse_id(&id)?;
    let file = read_photo_field(multipart).await?;

    let uploaded = AlbumPhotoUseCase::new(state.repo.clone(), state.photos.clone())
        .set(album_id, current.user_id, file)
        .await?;

    Ok(Json(ServiceResponse::success(uploaded, "Photo uploaded")))
}

/// DELETE /api/Album/{id}/Photo
pub async fn delete_album_photo<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<DeletionResult>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id: AlbumId = parse_id(&id)?;
    let result = AlbumPhotoUseCase::new(state.repo.clone(), state.photos.clone())
        .delete(album_id, current.user_id)
        .await?;

    Ok(Json(ServiceResponse::success(result, "Photo deleted")))
}

async fn read_photo_field(mut multipart: Multipart) -> SocialResult<PhotoUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SocialError::Validation(e.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| SocialError::Validation(e.body_text()))?;

        if bytes.is_empty() {
            return Err(SocialError::MissingFile);
        }

        return Ok(PhotoUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(SocialError::MissingFile)
}

// ============================================================================
// Likes
// ============================================================================

/// POST /api/Album/{id}/Like
pub async fn like_album<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<()>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id: AlbumId = parse_id(&id)?;
    LikeUseCase::new(state.repo.clone())
        .like(album_id, current.user_id)
        .await?;

    Ok(Json(ServiceResponse::message("Album liked")))
}

/// DELETE /api/Album/{id}/Like
pub async fn unlike_album<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<()>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let album_id: AlbumId = parse_id(&id)?;
    LikeUseCase::new(state.repo.clone())
        .unlike(album_id, current.user_id)
        .await?;

    Ok(Json(ServiceResponse::message("Album unliked")))
}

// ============================================================================
// Profiles / Follows
// ============================================================================

/// GET /api/User/{id}
pub async fn get_profile<R, P>(
    State(state): State<SocialAppState<R, P>>,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<ProfileDto>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let user_id: UserId = parse_id(&id)?;
    let profile = ProfileUseCase::new(state.repo.clone()).get(user_id).await?;

    Ok(Json(ServiceResponse::success(
        ProfileDto::from(&profile),
        "Profile",
    )))
}

/// GET /api/User/{id}/Followers
pub async fn list_followers<R, P>(
    State(state): State<SocialAppState<R, P>>,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<Vec<FollowDto>>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let user_id: UserId = parse_id(&id)?;
    let followers = ProfileUseCase::new(state.repo.clone())
        .followers(user_id)
        .await?;

    Ok(Json(ServiceResponse::success(
        follows_to_dtos(&followers),
        "Followers",
    )))
}

/// GET /api/User/{id}/Following
pub async fn list_following<R, P>(
    State(state): State<SocialAppState<R, P>>,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<Vec<FollowDto>>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let user_id: UserId = parse_id(&id)?;
    let following = ProfileUseCase::new(state.repo.clone())
        .following(user_id)
        .await?;

    Ok(Json(ServiceResponse::success(
        follows_to_dtos(&following),
        "Following",
    )))
}

/// POST /api/User/{id}/Follow
pub async fn follow_user<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<()>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let target: UserId = parse_id(&id)?;
    FollowUseCase::new(state.repo.clone())
        .follow(current.user_id, target)
        .await?;

    Ok(Json(ServiceResponse::message("User followed")))
}

/// DELETE /api/User/{id}/Follow
pub async fn unfollow_user<R, P>(
    State(state): State<SocialAppState<R, P>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> SocialResult<Json<ServiceResponse<()>>>
where
    R: AlbumRepository + ProfileRepository + Send + Sync + 'static,
    P: PhotoService + Send + Sync + 'static,
{
    let target: UserId = parse_id(&id)?;
    FollowUseCase::new(state.repo.clone())
        .unfollow(current.user_id, target)
        .await?;

    Ok(Json(ServiceResponse::message("User unfollowed")))
}
