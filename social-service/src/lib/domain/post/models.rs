use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::post::errors::PostTitleError;
use crate::user::models::UserId;

/// Post aggregate entity.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post unique identifier type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post title value type, non-empty and at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    const MAX_LENGTH: usize = 200;

    /// Create a new valid post title.
    ///
    /// # Errors
    /// * `Empty` - Title is empty or whitespace only
    /// * `TooLong` - Title longer than 200 characters
    pub fn new(title: String) -> Result<Self, PostTitleError> {
        if title.trim().is_empty() {
            return Err(PostTitleError::Empty);
        }
        if title.len() > Self::MAX_LENGTH {
            return Err(PostTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: title.len(),
            });
        }
        Ok(Self(title))
    }

    /// Get title as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// New post record, id not yet assigned.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Command to create a post with validated fields.
#[derive(Debug)]
pub struct CreatePostCommand {
    pub title: PostTitle,
    pub content: String,
}

/// Command to replace a post's title and content.
#[derive(Debug)]
pub struct UpdatePostCommand {
    pub title: PostTitle,
    pub content: String,
}
