use thiserror::Error;

/// Error for PostTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostTitleError {
    #[error("Post title must not be empty")]
    Empty,

    #[error("Post title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all post-related operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post title: {0}")]
    InvalidTitle(#[from] PostTitleError),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("You are not the author of this post")]
    NotAuthor,

    #[error("You have already liked this post")]
    AlreadyLiked,

    #[error("You have not liked this post")]
    NotLiked,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
