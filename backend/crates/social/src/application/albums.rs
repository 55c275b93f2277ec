//! Album Use Cases

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AlbumId, UserId};

use crate::domain::entities::{Album, NewAlbum};
use crate::domain::photo::PhotoService;
use crate::domain::repository::AlbumRepository;
use crate::domain::value_objects::{AlbumDetails, Page};
use crate::error::{SocialError, SocialResult};

/// Create album input
pub struct CreateAlbumInput {
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub description: Option<String>,
}

pub struct CreateAlbumUseCase<A>
where
    A: AlbumRepository,
{
    album_repo: Arc<A>,
}

impl<A> CreateAlbumUseCase<A>
where
    A: AlbumRepository,
{
    pub fn new(album_repo: Arc<A>) -> Self {
        Self { album_repo }
    }

    pub async fn execute(&self, owner_id: UserId, input: CreateAlbumInput) -> SocialResult<AlbumId> {
        let details = AlbumDetails::new(
            &input.title,
            &input.artist,
            input.genre.as_deref(),
            input.release_year,
            input.description.as_deref(),
        )?;

        let album_id = self
            .album_repo
            .create_album(NewAlbum {
                owner_id,
                details,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(album_id = %album_id, owner_id = %owner_id, "Album created");

        Ok(album_id)
    }
}

pub struct GetAlbumUseCase<A>
where
    A: AlbumRepository,
{
    album_repo: Arc<A>,
}

impl<A> GetAlbumUseCase<A>
where
    A: AlbumRepository,
{
    pub fn new(album_repo: Arc<A>) -> Self {
        Self { album_repo }
    }

    pub async fn execute(&self, album_id: AlbumId) -> SocialResult<Album> {
        self.album_repo
            .find_album(album_id)
            .await?
            .ok_or(SocialError::AlbumNotFound)
    }

    pub async fn list(&self, page: Page) -> SocialResult<Vec<Album>> {
        self.album_repo.list_albums(page).await
    }
}

/// Deletes an album and its cover photo
pub struct DeleteAlbumUseCase<A, P>
where
    A: AlbumRepository,
    P: PhotoService,
{
    album_repo: Arc<A>,
    photos: Arc<P>,
}

impl<A, P> DeleteAlbumUseCase<A, P>
where
    A: AlbumRepository,
    P: PhotoService,
{
    pub fn new(album_repo: Arc<A>, photos: Arc<P>) -> Self {
        Self { album_repo, photos }
    }

    pub async fn execute(&self, album_id: AlbumId, caller: UserId) -> SocialResult<()> {
        let album = owned_album(self.album_repo.as_ref(), album_id, caller).await?;

        // Remove the remote file first so a failure leaves the album intact
        if let Some(photo) = &album.photo {
            self.photos.delete(&photo.public_id).await?;
        }

        if !self.album_repo.delete_album(album_id).await? {
            return Err(SocialError::AlbumNotFound);
        }

        tracing::info!(album_id = %album_id, "Album deleted");

        Ok(())
    }
}

/// Load an album and check `caller` owns it
pub(crate) async fn owned_album<A>(
    album_repo: &A,
    album_id: AlbumId,
    caller: UserId,
) -> SocialResult<Album>
where
    A: AlbumRepository,
{
    let album = album_repo
        .find_album(album_id)
        .await?
        .ok_or(SocialError::AlbumNotFound)?;

    if !album.is_owned_by(caller) {
        return Err(SocialError::NotAlbumOwner);
    }

    Ok(album)
}
