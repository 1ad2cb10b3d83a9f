use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::post::models::Post;
use crate::inbound::http::router::AppState;
use crate::user::models::Username;

pub async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<Vec<UserPostData>>, ApiError> {
    let username =
        Username::new(username).map_err(|e| ApiError::NotFound(e.to_string()))?;

    let user = state.user_service.get_user_by_username(&username).await?;
    let posts = state.post_service.posts_by_author(&user.id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        posts.iter().map(UserPostData::from).collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPostData {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for UserPostData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.0,
            author_id: post.author_id.0,
            title: post.title.as_str().to_string(),
            content: post.content.clone(),
            created_at: post.created_at,
        }
    }
}
