//! Entity to DTO projections
//!
//! Counts are never stored. They are the sizes of the loaded collections
//! at the moment of mapping.

use crate::domain::entities::{Album, FollowEntry, Profile};
use crate::presentation::dto::{AlbumDto, FollowDto, ProfileDto};

impl From<&Album> for AlbumDto {
    fn from(album: &Album) -> Self {
        Self {
            id: album.album_id.value(),
            owner_id: album.owner_id.value(),
            owner_name: album.owner_name.clone(),
            title: album.details.title.clone(),
            artist: album.details.artist.clone(),
            genre: album.details.genre.clone(),
            release_year: album.details.release_year,
            description: album.details.description.clone(),
            photo_url: album.photo.as_ref().map(|p| p.url.clone()),
            like_count: album.likes.len(),
            created_at: album.created_at,
        }
    }
}

impl From<&Profile> for ProfileDto {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.user.user_id.value(),
            username: profile.user.user_name.clone(),
            first_name: profile.user.first_name.clone(),
            last_name: profile.user.last_name.clone(),
            created_at: profile.user.created_at,
            follower_count: profile.followers.len(),
            following_count: profile.following.len(),
        }
    }
}

impl From<&FollowEntry> for FollowDto {
    fn from(entry: &FollowEntry) -> Self {
        Self {
            user_id: entry.user_id.value(),
            username: entry.user_name.clone(),
            since: entry.since,
        }
    }
}

pub fn albums_to_dtos(albums: &[Album]) -> Vec<AlbumDto> {
    albums.iter().map(AlbumDto::from).collect()
}

pub fn follows_to_dtos(entries: &[FollowEntry]) -> Vec<FollowDto> {
    entries.iter().map(FollowDto::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AlbumPhoto, UserSummary};
    use crate::domain::value_objects::AlbumDetails;
    use chrono::Utc;
    use kernel::id::{AlbumId, UserId};

    fn summary(id: i64, name: &str) -> UserSummary {
        UserSummary {
            user_id: UserId::from_i64(id),
            user_name: name.to_string(),
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
        }
    }

    fn entry(id: i64, name: &str) -> FollowEntry {
        FollowEntry {
            user_id: UserId::from_i64(id),
            user_name: name.to_string(),
            since: Utc::now(),
        }
    }

    #[test]
    fn test_album_like_count_is_collection_size() {
        let mut album = Album {
            album_id: AlbumId::from_i64(7),
            owner_id: UserId::from_i64(1),
            owner_name: "alice".to_string(),
            details: AlbumDetails::from_db("Blue".into(), "Joni".into(), None, Some(1971), None),
            photo: None,
            created_at: Utc::now(),
            likes: vec![UserId::from_i64(2), UserId::from_i64(3)],
        };

        let dto = AlbumDto::from(&album);
        assert_eq!(dto.like_count, 2);
        assert_eq!(dto.photo_url, None);

        album.likes.clear();
        album.photo = Some(AlbumPhoto {
            url: "https://res.example/a.jpg".into(),
            public_id: "albums/a".into(),
        });
        let dto = AlbumDto::from(&album);
        assert_eq!(dto.like_count, 0);
        assert_eq!(dto.photo_url.as_deref(), Some("https://res.example/a.jpg"));
    }

    #[test]
    fn test_profile_counts_are_collection_sizes() {
        let profile = Profile {
            user: summary(1, "alice"),
            followers: vec![entry(2, "bob"), entry(3, "carol"), entry(4, "dave")],
            following: vec![entry(2, "bob")],
        };

        let dto = ProfileDto::from(&profile);
        assert_eq!(dto.follower_count, 3);
        assert_eq!(dto.following_count, 1);

        let empty = Profile {
            user: summary(5, "erin"),
            followers: Vec::new(),
            following: Vec::new(),
        };
        let dto = ProfileDto::from(&empty);
        assert_eq!((dto.follower_count, dto.following_count), (0, 0));
    }

    #[test]
    fn test_dto_field_names() {
        let dto = FollowDto::from(&entry(2, "bob"));
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["userId"], 2);
        assert_eq!(value["username"], "bob");
        assert!(value.get("since").is_some());
    }
}
