use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn list_following(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<ListFollowingResponseData>, ApiError> {
    let user_id = UserId(user_id);
    let user = state.user_service.get_user(&user_id).await?;
    let following = state.user_service.list_following(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListFollowingResponseData {
            user_id: user.id.0,
            username: user.username.as_str().to_string(),
            following_count: following.len() as i64,
            following: following.iter().map(UserRef::from).collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFollowingResponseData {
    pub user_id: i64,
    pub username: String,
    pub following_count: i64,
    pub following: Vec<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
        }
    }
}
