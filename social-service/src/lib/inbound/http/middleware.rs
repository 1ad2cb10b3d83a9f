use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity of the authenticated caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

/// Middleware that resolves a bearer token to a user identity.
///
/// Extract, verify, resolve: the header must carry a bearer token, the token
/// must verify, and the user id it names must still exist. Every failure
/// yields the same 401 body; the sub-reason only reaches the logs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = %e, "Token verification failed");
        unauthorized()
    })?;

    let user_id = claims.user_id().map(UserId).ok_or_else(|| {
        tracing::warn!("Verified token is missing a user id claim");
        unauthorized()
    })?;

    // Resolve by id, not username: the token stays valid across a rename
    // but must die with the account.
    let user = state.user_service.get_user(&user_id).await.map_err(|e| {
        tracing::warn!(user_id = %user_id, reason = %e, "Token subject not resolvable");
        unauthorized()
    })?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username.to_string(),
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::debug!("Authorization header is not valid UTF-8");
        unauthorized()
    })?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("Authorization header is not a bearer credential");
        unauthorized()
    })?;

    Ok(token)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Could not validate user"
        })),
    )
        .into_response()
}
