use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::current_user::current_user;
use super::handlers::delete_post::delete_post;
use super::handlers::feed_users::feed_users;
use super::handlers::follow_user::follow_user;
use super::handlers::health::health;
use super::handlers::like_post::like_post;
use super::handlers::list_followers::list_followers;
use super::handlers::list_following::list_following;
use super::handlers::login::login;
use super::handlers::register_user::register_user;
use super::handlers::unfollow_user::unfollow_user;
use super::handlers::unlike_post::unlike_post;
use super::handlers::update_post::update_post;
use super::handlers::user_posts::user_posts;
use super::middleware::authenticate as auth_middleware;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub token_ttl_minutes: i64,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    post_service: Arc<dyn PostServicePort>,
    authenticator: Arc<Authenticator>,
    token_ttl_minutes: i64,
) -> Router {
    let state = AppState {
        user_service,
        post_service,
        authenticator,
        token_ttl_minutes,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(register_user))
        .route("/auth/token", post(login))
        .route("/users/:user_id/followers", get(list_followers))
        .route("/users/:user_id/following", get(list_following))
        .route("/feed/users", get(feed_users))
        .route("/feed/posts/:username", get(user_posts));

    let protected_routes = Router::new()
        .route("/user", get(current_user))
        .route("/posts", post(create_post))
        .route("/posts/:post_id", put(update_post).delete(delete_post))
        .route("/posts/:post_id/like", post(like_post).delete(unlike_post))
        .route(
            "/users/:user_id/follow",
            post(follow_user).delete(unfollow_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
