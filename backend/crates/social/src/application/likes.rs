//! Like Use Cases

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AlbumId, UserId};

use crate::domain::repository::AlbumRepository;
use crate::error::{SocialError, SocialResult};

pub struct LikeUseCase<A>
where
    A: AlbumRepository,
{
    album_repo: Arc<A>,
}

impl<A> LikeUseCase<A>
where
    A: AlbumRepository,
{
    pub fn new(album_repo: Arc<A>) -> Self {
        Self { album_repo }
    }

    pub async fn like(&self, album_id: AlbumId, user_id: UserId) -> SocialResult<()> {
        self.ensure_album(album_id).await?;

        if !self
            .album_repo
            .add_like(album_id, user_id, Utc::now())
            .await?
        {
            return Err(SocialError::AlreadyLiked);
        }

        tracing::debug!(album_id = %album_id, user_id = %user_id, "Album liked");
        Ok(())
    }

    pub async fn unlike(&self, album_id: AlbumId, user_id: UserId) -> SocialResult<()> {
        self.ensure_album(album_id).await?;

        if !self.album_repo.remove_like(album_id, user_id).await? {
            return Err(SocialError::NotLiked);
        }

        tracing::debug!(album_id = %album_id, user_id = %user_id, "Album unliked");
        Ok(())
    }

    async fn ensure_album(&self, album_id: AlbumId) -> SocialResult<()> {
        match self.album_repo.find_album(album_id).await? {
            Some(_) => Ok(()),
            None => Err(SocialError::AlbumNotFound),
        }
    }
}
