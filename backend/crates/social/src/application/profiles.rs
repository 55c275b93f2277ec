//! Profile Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::{FollowEntry, Profile};
use crate::domain::repository::ProfileRepository;
use crate::error::{SocialError, SocialResult};

pub struct ProfileUseCase<P>
where
    P: ProfileRepository,
{
    profile_repo: Arc<P>,
}

impl<P> ProfileUseCase<P>
where
    P: ProfileRepository,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    /// User with both follow collections loaded
    pub async fn get(&self, user_id: UserId) -> SocialResult<Profile> {
        let user = self
            .profile_repo
            .find_user(user_id)
            .await?
            .ok_or(SocialError::UserNotFound)?;

        let followers = self.profile_repo.list_followers(user_id).await?;
        let following = self.profile_repo.list_following(user_id).await?;

        Ok(Profile {
            user,
            followers,
            following,
        })
    }

    pub async fn followers(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>> {
        self.ensure_user(user_id).await?;
        self.profile_repo.list_followers(user_id).await
    }

    pub async fn following(&self, user_id: UserId) -> SocialResult<Vec<FollowEntry>> {
        self.ensure_user(user_id).await?;
        self.profile_repo.list_following(user_id).await
    }

    async fn ensure_user(&self, user_id: UserId) -> SocialResult<()> {
        match self.profile_repo.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(SocialError::UserNotFound),
        }
    }
}
