//! Album Photo Use Cases
//!
//! Provider responses are returned to the caller as received.

use std::sync::Arc;

use kernel::id::{AlbumId, UserId};

use crate::application::albums::owned_album;
use crate::domain::entities::AlbumPhoto;
use crate::domain::photo::{DeletionResult, PhotoService, PhotoUpload, UploadResult};
use crate::domain::repository::AlbumRepository;
use crate::error::{SocialError, SocialResult};

pub struct AlbumPhotoUseCase<A, P>
where
    A: AlbumRepository,
    P: PhotoService,
{
    album_repo: Arc<A>,
    photos: Arc<P>,
}

impl<A, P> AlbumPhotoUseCase<A, P>
where
    A: AlbumRepository,
    P: PhotoService,
{
    pub fn new(album_repo: Arc<A>, photos: Arc<P>) -> Self {
        Self { album_repo, photos }
    }

    /// Upload a new cover, replacing any previous one
    pub async fn set(
        &self,
        album_id: AlbumId,
        caller: UserId,
        file: PhotoUpload,
    ) -> SocialResult<UploadResult> {
        let album = owned_album(self.album_repo.as_ref(), album_id, caller).await?;

        let uploaded = self.photos.upload(file).await?;
        let photo = AlbumPhoto {
            url: uploaded.secure_url.clone(),
            public_id: uploaded.public_id.clone(),
        };

        let stored = match self.album_repo.set_album_photo(album_id, Some(&photo)).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(SocialError::AlbumNotFound),
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            self.discard_upload(album_id, &photo.public_id).await;
            return Err(e);
        }

        if let Some(previous) = album.photo {
            // The new cover is already stored; an orphaned remote file is only logged
            if let Err(e) = self.photos.delete(&previous.public_id).await {
                tracing::warn!(
                    album_id = %album_id,
                    public_id = %previous.public_id,
                    error = %e,
                    "Failed to delete replaced album photo"
                );
            }
        }

        tracing::info!(album_id = %album_id, public_id = %photo.public_id, "Album photo set");

        Ok(uploaded)
    }

    /// Best-effort removal of an upload that never made it into the store
    async fn discard_upload(&self, album_id: AlbumId, public_id: &str) {
        if let Err(e) = self.photos.delete(public_id).await {
            tracing::warn!(
                album_id = %album_id,
                public_id = %public_id,
                error = %e,
                "Failed to delete unreferenced album photo"
            );
        }
    }

    /// Delete the cover at the host and forget it
    pub async fn delete(&self, album_id: AlbumId, caller: UserId) -> SocialResult<DeletionResult> {
        let album = owned_album(self.album_repo.as_ref(), album_id, caller).await?;
        let photo = album.photo.ok_or(SocialError::NoAlbumPhoto)?;

        let result = self.photos.delete(&photo.public_id).await?;
        self.album_repo.set_album_photo(album_id, None).await?;

        tracing::info!(album_id = %album_id, result = %result.result, "Album photo deleted");

        Ok(result)
    }
}
