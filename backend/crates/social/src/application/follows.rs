//! Follow Use Cases

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::repository::ProfileRepository;
use crate::error::{SocialError, SocialResult};

pub struct FollowUseCase<P>
where
    P: ProfileRepository,
{
    profile_repo: Arc<P>,
}

impl<P> FollowUseCase<P>
where
    P: ProfileRepository,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    pub async fn follow(&self, caller: UserId, target: UserId) -> SocialResult<()> {
        if caller == target {
            return Err(SocialError::CannotFollowSelf);
        }
        self.ensure_user(target).await?;

        if !self
            .profile_repo
            .follow(caller, target, Utc::now())
            .await?
        {
            return Err(SocialError::AlreadyFollowing);
        }

        tracing::debug!(follower = %caller, followee = %target, "User followed");
        Ok(())
    }

    pub async fn unfollow(&self, caller: UserId, target: UserId) -> SocialResult<()> {
        if caller == target {
            return Err(SocialError::CannotFollowSelf);
        }
        self.ensure_user(target).await?;

        if !self.profile_repo.unfollow(caller, target).await? {
            return Err(SocialError::NotFollowing);
        }

        tracing::debug!(follower = %caller, followee = %target, "User unfollowed");
        Ok(())
    }

    async fn ensure_user(&self, user_id: UserId) -> SocialResult<()> {
        match self.profile_repo.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(SocialError::UserNotFound),
        }
    }
}
