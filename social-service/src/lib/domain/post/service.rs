use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::post::errors::PostError;
use crate::post::ports::PostRepository;
use crate::post::ports::PostServicePort;
use crate::user::models::UserId;

/// Domain service implementation for post operations.
pub struct PostService<PR>
where
    PR: PostRepository,
{
    repository: Arc<PR>,
}

impl<PR> PostService<PR>
where
    PR: PostRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }

    async fn owned_post(&self, author: &UserId, id: &PostId) -> Result<Post, PostError> {
        let post = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        if post.author_id != *author {
            return Err(PostError::NotAuthor);
        }

        Ok(post)
    }
}

#[async_trait]
impl<PR> PostServicePort for PostService<PR>
where
    PR: PostRepository,
{
    async fn create_post(
        &self,
        author: &UserId,
        command: CreatePostCommand,
    ) -> Result<Post, PostError> {
        let post = NewPost {
            author_id: *author,
            title: command.title,
            content: command.content,
            created_at: Utc::now(),
        };

        self.repository.create(post).await
    }

    async fn update_post(
        &self,
        author: &UserId,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError> {
        let mut post = self.owned_post(author, id).await?;

        post.title = command.title;
        post.content = command.content;

        self.repository.update(post).await
    }

    async fn delete_post(&self, author: &UserId, id: &PostId) -> Result<(), PostError> {
        self.owned_post(author, id).await?;

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(PostError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn like_post(&self, user: &UserId, id: &PostId) -> Result<Post, PostError> {
        let post = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        let inserted = self.repository.like(user, id).await?;
        if !inserted {
            return Err(PostError::AlreadyLiked);
        }

        Ok(post)
    }

    async fn unlike_post(&self, user: &UserId, id: &PostId) -> Result<Post, PostError> {
        let post = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        let removed = self.repository.unlike(user, id).await?;
        if !removed {
            return Err(PostError::NotLiked);
        }

        Ok(post)
    }

    async fn posts_by_author(&self, author: &UserId) -> Result<Vec<Post>, PostError> {
        self.repository.find_by_author(author).await
    }
}
