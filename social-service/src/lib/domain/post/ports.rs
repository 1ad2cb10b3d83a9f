use async_trait::async_trait;

use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::post::errors::PostError;
use crate::user::models::UserId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Create a post authored by `author`.
    async fn create_post(
        &self,
        author: &UserId,
        command: CreatePostCommand,
    ) -> Result<Post, PostError>;

    /// Replace the title and content of a post the caller authored.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `NotAuthor` - Caller is not the post's author
    /// * `DatabaseError` - Database operation failed
    async fn update_post(
        &self,
        author: &UserId,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError>;

    /// Delete a post the caller authored.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `NotAuthor` - Caller is not the post's author
    /// * `DatabaseError` - Database operation failed
    async fn delete_post(&self, author: &UserId, id: &PostId) -> Result<(), PostError>;

    /// Record `user`'s like on a post. Returns the liked post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `AlreadyLiked` - The like already exists
    /// * `DatabaseError` - Database operation failed
    async fn like_post(&self, user: &UserId, id: &PostId) -> Result<Post, PostError>;

    /// Remove `user`'s like from a post. Returns the unliked post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `NotLiked` - No like to remove
    /// * `DatabaseError` - Database operation failed
    async fn unlike_post(&self, user: &UserId, id: &PostId) -> Result<Post, PostError>;

    /// All posts by `author`, newest first.
    async fn posts_by_author(&self, author: &UserId) -> Result<Vec<Post>, PostError>;
}

/// Persistence operations for posts and likes.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Persist a new post and return it with its assigned id.
    async fn create(&self, post: NewPost) -> Result<Post, PostError>;

    /// Retrieve post by identifier, `None` if not found.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError>;

    /// All posts by `author`, newest first.
    async fn find_by_author(&self, author: &UserId) -> Result<Vec<Post>, PostError>;

    /// Update an existing post's title and content.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, post: Post) -> Result<Post, PostError>;

    /// Remove a post. Returns `false` when no post existed.
    async fn delete(&self, id: &PostId) -> Result<bool, PostError>;

    /// Record a like edge. Returns `false` when the like already existed.
    async fn like(&self, user: &UserId, post: &PostId) -> Result<bool, PostError>;

    /// Remove a like edge. Returns `false` when no like existed.
    async fn unlike(&self, user: &UserId, post: &PostId) -> Result<bool, PostError>;
}
