use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn follow_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<FollowUserResponseData>, ApiError> {
    let outcome = state
        .user_service
        .follow_user(&user.id, &UserId(user_id))
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        FollowUserResponseData {
            message: format!("You are now following {}", outcome.target_username),
            following_count: outcome.following_count,
            followers_count: outcome.followers_count,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUserResponseData {
    pub message: String,
    pub following_count: i64,
    pub followers_count: i64,
}
