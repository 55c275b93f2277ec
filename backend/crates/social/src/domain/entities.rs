//! Social Entities

use chrono::{DateTime, Utc};
use kernel::id::{AlbumId, UserId};

use crate::domain::value_objects::AlbumDetails;

/// Cover photo stored at the image host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumPhoto {
    pub url: String,
    pub public_id: String,
}

/// Album with its likes
#[derive(Debug, Clone)]
pub struct Album {
    pub album_id: AlbumId,
    pub owner_id: UserId,
    pub owner_name: String,
    pub details: AlbumDetails,
    pub photo: Option<AlbumPhoto>,
    pub created_at: DateTime<Utc>,
    /// Users who liked this album
    pub likes: Vec<UserId>,
}

impl Album {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    pub fn is_liked_by(&self, user_id: UserId) -> bool {
        self.likes.contains(&user_id)
    }
}

/// Album about to be inserted
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub owner_id: UserId,
    pub details: AlbumDetails,
    pub created_at: DateTime<Utc>,
}

/// Public fields of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: UserId,
    pub user_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One side of a follow relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowEntry {
    pub user_id: UserId,
    pub user_name: String,
    pub since: DateTime<Utc>,
}

/// User with both follow collections
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: UserSummary,
    pub followers: Vec<FollowEntry>,
    pub following: Vec<FollowEntry>,
}
