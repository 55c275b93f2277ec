//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{AlbumId, UserId};
use sqlx::PgPool;

use crate::domain::entities::{Album, AlbumPhoto, FollowEntry, NewAlbum, UserSummary};
use crate::domain::repository::{AlbumRepository, ProfileRepository};
use crate::domain::value_objects::{AlbumDetails, Page};
use crate::error::{SocialError, SocialResult};

const SELECT_ALBUM: &str = r#"
    SELECT
        a.album_id,
        a.owner_id,
        u.user_name AS owner_name,
        a.title,
        a.artist,
        a.genre,
        a.release_year,
        a.description,
        a.photo_url,
        a.photo_public_id,
        a.created_at,
        ARRAY(
            SELECT l.user_id FROM album_likes l
            WHERE l.album_id = a.album_id
            ORDER BY l.liked_at
        ) AS likes
    FROM albums a
    JOIN users u ON u.user_id = a.owner_id
"#;

/// PostgreSQL-backed social repository
#[derive(Clone)]
pub struct PgSocialRepository {
    pool: PgPool,
}

impl PgSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Album Repository Implementation
// ============================================================================

impl AlbumRepository for PgSocialRepository {
    async fn create_album(&self, album: NewAlbum) -> SocialResult<AlbumId> {
        let album_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO albums (
                owner_id,
                title,
                artist,
                genre,
                release_year,
                description,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING album_id
            "#,
        )
        .bind(album.owner_id.value())
        .bind(&album.details.title)
        .bind(&album.details.artist)
        .bind(album.details.genre.as_deref())
        .bind(album.details.release_year)
        .bind(album.details.description.as_deref())
        .bind(album.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_reference)?;

        Ok(AlbumId::from_i64(album_id))
    }

    async fn find_album(&self, album_id: AlbumId) -> SocialResult<Option<Album>> {
        let sql = format!("{SELECT_ALBUM} WHERE a.album_id = $1");
        let row = sqlx::query_as::<_, AlbumRow>(&sql)
            .bind(album_id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AlbumRow::into_album))
    }

    async fn list_albums(&self, page: Page) -> SocialResult<Vec<Album>> {
        let sql = format!(
            "{SELECT_ALBUM} ORDER BY a.created_at DESC, a.album_id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, AlbumRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AlbumRow::into_album).collect())
    }

    async fn delete_album(&self, album_id: AlbumId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM albums WHERE album_id = $1")
            .bind(album_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_album_photo(
        &self,
        album_id: AlbumId,
        photo: Option<&AlbumPhoto>,
    ) -> SocialResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE albums
            SET photo_url = $2, photo_public_id = $3
            WHERE album_id = $1
            "#,
        )
        .bind(album_id.value())
        .bind(photo.map(|p| p.url.as_str()))
        .bind(photo.map(|p| p.public_id.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_like(
        &self,
        album_id: AlbumId,
        user_id: UserId,
        liked_at: DateTime<Utc>,
    ) -> SocialResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO album_likes (album_id, user_id, liked_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (album_id, user_id) DO NOTHING
            "#,
        )
        .bind(album_id.value())
        .bind(user_id.value())
        .bind(liked_at)
        .execute(&self.pool)
        .await
        .map_err(missing_reference)?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_like(&self, album_id: AlbumId, user_id: UserId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM album_likes WHERE album_id = $1 AND user_id = $2")
            .bind(album_id.value())
            .bind(user_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgSocialRepository {
    async fn find_user(&self, user_id: UserId) -> SocialResult<Option<UserSummary>> {
        let row = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT user_id, user_name, first_name, last_name, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserSummaryRow::into_summary))
    }

    async fn list_followers(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>> {
        let rows = sqlx::query_as::<_, FollowRow>(
            r#"
            SELECT u.user_id, u.user_name, f.created_at AS since
            FROM follows f
            JOIN users u ON u.user_id = f.follower_id
            WHERE f.followee_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FollowRow::into_entry).collect())
    }

    async fn list_following(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>> {
        let rows = sqlx::query_as::<_, FollowRow>(
            r#"
            SELECT u.user_id, u.user_name, f.created_at AS since
            FROM follows f
            JOIN users u ON u.user_id = f.followee_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FollowRow::into_entry).collect())
    }

    async fn follow(
        &self,
        follower: UserId,
        followee: UserId,
        since: DateTime<Utc>,
    ) -> SocialResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower.value())
        .bind(followee.value())
        .bind(since)
        .execute(&self.pool)
        .await
        .map_err(missing_reference)?;

        Ok(result.rows_affected() == 1)
    }

    async fn unfollow(&self, follower: UserId, followee: UserId) -> SocialResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
                .bind(follower.value())
                .bind(followee.value())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Map a dangling user or album reference to the matching not-found error
fn missing_reference(err: sqlx::Error) -> SocialError {
    let sqlx::Error::Database(db_err) = &err else {
        return SocialError::Database(err);
    };
    if !db_err.is_foreign_key_violation() {
        return SocialError::Database(err);
    }
    db_err
        .constraint()
        .and_then(reference_error)
        .unwrap_or(SocialError::Database(err))
}

fn reference_error(constraint: &str) -> Option<SocialError> {
    match constraint {
        "albums_owner_id_fkey"
        | "album_likes_user_id_fkey"
        | "follows_follower_id_fkey"
        | "follows_followee_id_fkey" => Some(SocialError::UserNotFound),
        "album_likes_album_id_fkey" => Some(SocialError::AlbumNotFound),
        _ => None,
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AlbumRow {
    album_id: i64,
    owner_id: i64,
    owner_name: String,
    title: String,
    artist: String,
    genre: Option<String>,
    release_year: Option<i32>,
    description: Option<String>,
    photo_url: Option<String>,
    photo_public_id: Option<String>,
    created_at: DateTime<Utc>,
    likes: Vec<i64>,
}

impl AlbumRow {
    fn into_album(self) -> Album {
        let photo = match (self.photo_url, self.photo_public_id) {
            (Some(url), Some(public_id)) => Some(AlbumPhoto { url, public_id }),
            _ => None,
        };

        Album {
            album_id: AlbumId::from_i64(self.album_id),
            owner_id: UserId::from_i64(self.owner_id),
            owner_name: self.owner_name,
            details: AlbumDetails::from_db(
                self.title,
                self.artist,
                self.genre,
                self.release_year,
                self.description,
            ),
            photo,
            created_at: self.created_at,
            likes: self.likes.into_iter().map(UserId::from_i64).collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    user_id: i64,
    user_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserSummaryRow {
    fn into_summary(self) -> UserSummary {
        UserSummary {
            user_id: UserId::from_i64(self.user_id),
            user_name: self.user_name,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FollowRow {
    user_id: i64,
    user_name: String,
    since: DateTime<Utc>,
}

impl FollowRow {
    fn into_entry(self) -> FollowEntry {
        FollowEntry {
            user_id: UserId::from_i64(self.user_id),
            user_name: self.user_name,
            since: self.since,
        }
    }
}
