use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserSummary;
use crate::inbound::http::router::AppState;

/// How many users the feed surfaces per request.
const FEED_USER_COUNT: i64 = 5;

pub async fn feed_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<FeedUserData>>, ApiError> {
    let users = state.user_service.sample_users(FEED_USER_COUNT).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        users.iter().map(FeedUserData::from).collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedUserData {
    pub id: i64,
    pub username: String,
    pub followers_count: i64,
}

impl From<&UserSummary> for FeedUserData {
    fn from(summary: &UserSummary) -> Self {
        Self {
            id: summary.id.0,
            username: summary.username.as_str().to_string(),
            followers_count: summary.followers_count,
        }
    }
}
