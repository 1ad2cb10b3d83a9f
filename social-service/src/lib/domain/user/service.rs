use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::FollowOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSummary;
use crate::user::errors::UserError;
use crate::user::models::Username;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Hasher configured with the deployment's cost parameters
    pub fn new(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    async fn follow_counts(
        &self,
        follower: &UserId,
        target: &User,
    ) -> Result<FollowOutcome, UserError> {
        Ok(FollowOutcome {
            target_username: target.username.clone(),
            following_count: self.repository.count_following(follower).await?,
            followers_count: self.repository.count_followers(&target.id).await?,
        })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))?;

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn follow_user(
        &self,
        follower: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome, UserError> {
        if follower == target {
            return Err(UserError::CannotFollowSelf);
        }

        let target_user = self
            .repository
            .find_by_id(target)
            .await?
            .ok_or(UserError::NotFound(target.to_string()))?;

        let inserted = self.repository.follow(follower, target).await?;
        if !inserted {
            return Err(UserError::AlreadyFollowing);
        }

        self.follow_counts(follower, &target_user).await
    }

    async fn unfollow_user(
        &self,
        follower: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome, UserError> {
        if follower == target {
            return Err(UserError::CannotFollowSelf);
        }

        let target_user = self
            .repository
            .find_by_id(target)
            .await?
            .ok_or(UserError::NotFound(target.to_string()))?;

        let removed = self.repository.unfollow(follower, target).await?;
        if !removed {
            return Err(UserError::NotFollowing);
        }

        self.follow_counts(follower, &target_user).await
    }

    async fn list_followers(&self, id: &UserId) -> Result<Vec<User>, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        self.repository.followers(id).await
    }

    async fn list_following(&self, id: &UserId) -> Result<Vec<User>, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        self.repository.following(id).await
    }

    async fn sample_users(&self, count: i64) -> Result<Vec<UserSummary>, UserError> {
        self.repository.sample_with_follower_counts(count).await
    }
}
