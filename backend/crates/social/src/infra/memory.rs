//! In-Memory Repository Implementation
//!
//! Users are seeded with [`InMemorySocialRepository::add_user`]; the auth
//! crate owns user creation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{AlbumId, UserId};
use tokio::sync::RwLock;

use crate::domain::entities::{Album, AlbumPhoto, FollowEntry, NewAlbum, UserSummary};
use crate::domain::repository::{AlbumRepository, ProfileRepository};
use crate::domain::value_objects::{AlbumDetails, Page};
use crate::error::{SocialError, SocialResult};

struct StoredAlbum {
    owner_id: UserId,
    details: AlbumDetails,
    photo: Option<AlbumPhoto>,
    created_at: DateTime<Utc>,
    likes: Vec<(UserId, DateTime<Utc>)>,
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, UserSummary>,
    last_album_id: i64,
    albums: BTreeMap<AlbumId, StoredAlbum>,
    /// (follower, followee) -> since
    follows: BTreeMap<(UserId, UserId), DateTime<Utc>>,
}

impl MemoryState {
    fn album(&self, album_id: AlbumId) -> Option<Album> {
        let stored = self.albums.get(&album_id)?;
        let owner_name = self
            .users
            .get(&stored.owner_id)
            .map(|u| u.user_name.clone())
            .unwrap_or_default();

        Some(Album {
            album_id,
            owner_id: stored.owner_id,
            owner_name,
            details: stored.details.clone(),
            photo: stored.photo.clone(),
            created_at: stored.created_at,
            likes: stored.likes.iter().map(|(user_id, _)| *user_id).collect(),
        })
    }

    fn entries<F>(&self, select: F) -> Vec<FollowEntry>
    where
        F: Fn(&(UserId, UserId)) -> Option<UserId>,
    {
        let mut entries: Vec<FollowEntry> = self
            .follows
            .iter()
            .filter_map(|(pair, since)| {
                let other = select(pair)?;
                let user = self.users.get(&other)?;
                Some(FollowEntry {
                    user_id: other,
                    user_name: user.user_name.clone(),
                    since: *since,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.since.cmp(&a.since));
        entries
    }
}

#[derive(Clone, Default)]
pub struct InMemorySocialRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemorySocialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user known to the social context
    pub async fn add_user(&self, user_id: UserId, user_name: &str) {
        let mut state = self.state.write().await;
        state.users.insert(
            user_id,
            UserSummary {
                user_id,
                user_name: user_name.to_string(),
                first_name: None,
                last_name: None,
                created_at: Utc::now(),
            },
        );
    }
}

impl AlbumRepository for InMemorySocialRepository {
    async fn create_album(&self, album: NewAlbum) -> SocialResult<AlbumId> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&album.owner_id) {
            return Err(SocialError::UserNotFound);
        }

        state.last_album_id += 1;
        let album_id = AlbumId::from_i64(state.last_album_id);
        state.albums.insert(
            album_id,
            StoredAlbum {
                owner_id: album.owner_id,
                details: album.details,
                photo: None,
                created_at: album.created_at,
                likes: Vec::new(),
            },
        );

        Ok(album_id)
    }

    async fn find_album(&self, album_id: AlbumId) -> SocialResult<Option<Album>> {
        Ok(self.state.read().await.album(album_id))
    }

    async fn list_albums(&self, page: Page) -> SocialResult<Vec<Album>> {
        let state = self.state.read().await;
        let mut ids: Vec<(DateTime<Utc>, AlbumId)> = state
            .albums
            .iter()
            .map(|(id, a)| (a.created_at, *id))
            .collect();
        ids.sort_by(|a, b| b.cmp(a));

        Ok(ids
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .filter_map(|(_, id)| state.album(id))
            .collect())
    }

    async fn delete_album(&self, album_id: AlbumId) -> SocialResult<bool> {
        Ok(self.state.write().await.albums.remove(&album_id).is_some())
    }

    async fn set_album_photo(
        &self,
        album_id: AlbumId,
        photo: Option<&AlbumPhoto>,
    ) -> SocialResult<bool> {
        let mut state = self.state.write().await;
        match state.albums.get_mut(&album_id) {
            Some(album) => {
                album.photo = photo.cloned();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_like(
        &self,
        album_id: AlbumId,
        user_id: UserId,
        liked_at: DateTime<Utc>,
    ) -> SocialResult<bool> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(SocialError::UserNotFound);
        }
        let album = state
            .albums
            .get_mut(&album_id)
            .ok_or(SocialError::AlbumNotFound)?;

        if album.likes.iter().any(|(id, _)| *id == user_id) {
            return Ok(false);
        }
        album.likes.push((user_id, liked_at));
        Ok(true)
    }

    async fn remove_like(&self, album_id: AlbumId, user_id: UserId) -> SocialResult<bool> {
        let mut state = self.state.write().await;
        let Some(album) = state.albums.get_mut(&album_id) else {
            return Ok(false);
        };

        let before = album.likes.len();
        album.likes.retain(|(id, _)| *id != user_id);
        Ok(album.likes.len() != before)
    }
}

impl ProfileRepository for InMemorySocialRepository {
    async fn find_user(&self, user_id: UserId) -> SocialResult<Option<UserSummary>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn list_followers(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>> {
        let state = self.state.read().await;
        Ok(state.entries(|(follower, followee)| (*followee == user_id).then_some(*follower)))
    }

    async fn list_following(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>> {
        let state = self.state.read().await;
        Ok(state.entries(|(follower, followee)| (*follower == user_id).then_some(*followee)))
    }

    async fn follow(
        &self,
        follower: UserId,
        followee: UserId,
        since: DateTime<Utc>,
    ) -> SocialResult<bool> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&follower) || !state.users.contains_key(&followee) {
            return Err(SocialError::UserNotFound);
        }
        if state.follows.contains_key(&(follower, followee)) {
            return Ok(false);
        }
        state.follows.insert((follower, followee), since);
        Ok(true)
    }

    async fn unfollow(&self, follower: UserId, followee: UserId) -> SocialResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .follows
            .remove(&(follower, followee))
            .is_some())
    }
}
