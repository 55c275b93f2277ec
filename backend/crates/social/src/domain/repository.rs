//! Repository Traits

use chrono::{DateTime, Utc};
use kernel::id::{AlbumId, UserId};

use crate::domain::entities::{Album, AlbumPhoto, FollowEntry, NewAlbum, UserSummary};
use crate::domain::value_objects::Page;
use crate::error::SocialResult;

/// Album repository trait
#[trait_variant::make(AlbumRepository: Send)]
pub trait LocalAlbumRepository {
    async fn create_album(&self, album: NewAlbum) -> SocialResult<AlbumId>;

    /// Album with owner name and likes
    async fn find_album(&self, album_id: AlbumId) -> SocialResult<Option<Album>>;

    /// Newest first
    async fn list_albums(&self, page: Page) -> SocialResult<Vec<Album>>;

    async fn delete_album(&self, album_id: AlbumId) -> SocialResult<bool>;

    /// Replace or clear the cover photo
    async fn set_album_photo(
        &self,
        album_id: AlbumId,
        photo: Option<&AlbumPhoto>,
    ) -> SocialResult<bool>;

    /// Returns `false` if the like already existed
    async fn add_like(
        &self,
        album_id: AlbumId,
        user_id: UserId,
        liked_at: DateTime<Utc>,
    ) -> SocialResult<bool>;

    /// Returns `false` if there was no like
    async fn remove_like(&self, album_id: AlbumId, user_id: UserId) -> SocialResult<bool>;
}

/// Users and follow relations
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn find_user(&self, user_id: UserId) -> SocialResult<Option<UserSummary>>;

    /// Users following `user_id`, most recent first
    async fn list_followers(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>>;

    /// Users `user_id` follows, most recent first
    async fn list_following(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>>;

    /// Returns `false` if the relation already existed
    async fn follow(
        &self,
        follower: UserId,
        followee: UserId,
        since: DateTime<Utc>,
    ) -> SocialResult<bool>;

    /// Returns `false` if there was no relation
    async fn unfollow(&self, follower: UserId, followee: UserId) -> SocialResult<bool>;
}
