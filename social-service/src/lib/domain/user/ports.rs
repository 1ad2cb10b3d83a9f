use async_trait::async_trait;

use crate::domain::user::models::FollowOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSummary;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user, hashing the password before storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve user by unique username. Exact match, case-sensitive.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Make `follower` follow `target`.
    ///
    /// # Errors
    /// * `NotFound` - Target user does not exist
    /// * `CannotFollowSelf` - Follower and target are the same user
    /// * `AlreadyFollowing` - The relationship already exists
    /// * `DatabaseError` - Database operation failed
    async fn follow_user(
        &self,
        follower: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome, UserError>;

    /// Remove `follower`'s follow of `target`.
    ///
    /// # Errors
    /// * `NotFound` - Target user does not exist
    /// * `CannotFollowSelf` - Follower and target are the same user
    /// * `NotFollowing` - No such relationship exists
    /// * `DatabaseError` - Database operation failed
    async fn unfollow_user(
        &self,
        follower: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome, UserError>;

    /// List the users following `id`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn list_followers(&self, id: &UserId) -> Result<Vec<User>, UserError>;

    /// List the users `id` is following.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn list_following(&self, id: &UserId) -> Result<Vec<User>, UserError>;

    /// Pick up to `count` random users with their follower counts.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn sample_users(&self, count: i64) -> Result<Vec<UserSummary>, UserError>;
}

/// Persistence operations for the user aggregate and the follow graph.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and return it with its assigned id.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier, `None` if not found.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username, `None` if not found.
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Record a follow edge. Returns `false` when the edge already existed.
    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<bool, UserError>;

    /// Remove a follow edge. Returns `false` when no edge existed.
    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<bool, UserError>;

    /// Users following `id`.
    async fn followers(&self, id: &UserId) -> Result<Vec<User>, UserError>;

    /// Users `id` is following.
    async fn following(&self, id: &UserId) -> Result<Vec<User>, UserError>;

    /// Number of users following `id`.
    async fn count_followers(&self, id: &UserId) -> Result<i64, UserError>;

    /// Number of users `id` is following.
    async fn count_following(&self, id: &UserId) -> Result<i64, UserError>;

    /// Up to `count` random users with follower counts.
    async fn sample_with_follower_counts(
        &self,
        count: i64,
    ) -> Result<Vec<UserSummary>, UserError>;
}
