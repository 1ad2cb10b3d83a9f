mod common;

use auth::Claims;
use auth::JwtHandler;
use axum::http::StatusCode;
use chrono::Utc;
use common::TestApp;
use common::TEST_JWT_SECRET;
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_resolve_identity() {
    let app = TestApp::spawn();

    let registered = app.register("bob", "secret123").await;
    assert_eq!(registered["username"], "bob");
    assert!(registered["id"].is_i64());
    // The stored hash never appears in a response.
    assert!(registered.get("password_hash").is_none());
    assert!(registered.get("stored_password").is_none());

    let token = app.login("bob", "secret123").await;
    assert!(!token.is_empty());

    let (status, body) = app.get("/user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "bob");
    assert_eq!(body["data"]["id"], registered["id"]);
}

#[tokio::test]
async fn test_login_response_is_bearer_token() {
    let app = TestApp::spawn();
    app.register("bob", "secret123").await;

    let (status, body) = app
        .post(
            "/auth/token",
            None,
            Some(json!({"username": "bob", "password": "secret123"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["access_token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn();
    app.register("alice", "correct-pw").await;

    let (wrong_pw_status, wrong_pw_body) = app
        .post(
            "/auth/token",
            None,
            Some(json!({"username": "alice", "password": "wrong-pw"})),
        )
        .await;
    let (ghost_status, ghost_body) = app
        .post(
            "/auth/token",
            None,
            Some(json!({"username": "ghost", "password": "anything"})),
        )
        .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(ghost_status, StatusCode::UNAUTHORIZED);
    // Same body for "no such user" and "bad password".
    assert_eq!(wrong_pw_body, ghost_body);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::spawn();

    let (status, _) = app.get("/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_malformed_header() {
    let app = TestApp::spawn();
    app.register("bob", "secret123").await;
    let token = app.login("bob", "secret123").await;

    // Right credential, wrong scheme.
    let (status, _) = app
        .post(
            "/posts",
            Some(&token),
            Some(json!({"title": "t", "content": "c"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .get_with_auth_header("/user", &format!("Basic {}", token))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_truncated_token_rejected() {
    let app = TestApp::spawn();
    app.register("bob", "secret123").await;
    let token = app.login("bob", "secret123").await;

    let truncated = &token[..token.len() - 1];
    let (status, _) = app.get("/user", Some(truncated)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let app = TestApp::spawn();
    let registered = app.register("bob", "secret123").await;

    let forger = JwtHandler::new(b"some-other-secret-32-bytes-long!!");
    let forged = forger
        .encode(&Claims::for_user(
            registered["id"].as_i64().unwrap(),
            "bob",
            60,
        ))
        .unwrap();

    let (status, _) = app.get("/user", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_rejected() {
    let app = TestApp::spawn();

    // Valid signature, but the subject id was never registered.
    let issuer = JwtHandler::new(TEST_JWT_SECRET);
    let token = issuer.encode(&Claims::for_user(9999, "nobody", 60)).unwrap();

    let (status, _) = app.get("/user", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::spawn();
    let registered = app.register("bob", "secret123").await;

    let issuer = JwtHandler::new(TEST_JWT_SECRET);
    let claims = Claims::new()
        .with_subject("bob")
        .with_user_id(registered["id"].as_i64().unwrap())
        .with_expiration(Utc::now().timestamp() - 2)
        .with_issued_at(Utc::now().timestamp() - 62);
    let token = issuer.encode(&claims).unwrap();

    let (status, _) = app.get("/user", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn();
    app.register("bob", "secret123").await;

    let (status, body) = app
        .post(
            "/users/register",
            None,
            Some(json!({
                "username": "bob",
                "email_address": "other@example.com",
                "password": "secret456",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::spawn();

    let (status, _) = app
        .post(
            "/users/register",
            None,
            Some(json!({
                "username": "bob",
                "email_address": "not-an-email",
                "password": "secret123",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let app = TestApp::spawn();
    app.register("alice", "pass_word!").await;
    let token = app.login("alice", "pass_word!").await;

    let (status, body) = app
        .post(
            "/posts",
            Some(&token),
            Some(json!({"title": "First post", "content": "hello world"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["title"], "First post");

    let (status, body) = app
        .put(
            &format!("/posts/{}", post_id),
            Some(&token),
            Some(json!({"title": "Edited", "content": "still hello"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Edited");

    let (status, body) = app.get("/feed/posts/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Edited");

    let (status, _) = app
        .delete(&format!("/posts/{}", post_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/feed/posts/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_foreign_post_forbidden() {
    let app = TestApp::spawn();
    app.register("alice", "pass_word!").await;
    app.register("mallory", "pass_word!").await;
    let alice_token = app.login("alice", "pass_word!").await;
    let mallory_token = app.login("mallory", "pass_word!").await;

    let (_, body) = app
        .post(
            "/posts",
            Some(&alice_token),
            Some(json!({"title": "Alice's post", "content": "mine"})),
        )
        .await;
    let post_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/posts/{}", post_id),
            Some(&mallory_token),
            Some(json!({"title": "Hijacked", "content": "mine now"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/posts/{}", post_id), Some(&mallory_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_like_and_unlike_post() {
    let app = TestApp::spawn();
    app.register("alice", "pass_word!").await;
    app.register("bob", "pass_word!").await;
    let alice_token = app.login("alice", "pass_word!").await;
    let bob_token = app.login("bob", "pass_word!").await;

    let (_, body) = app
        .post(
            "/posts",
            Some(&alice_token),
            Some(json!({"title": "Likeable", "content": "..."})),
        )
        .await;
    let post_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(&format!("/posts/{}/like", post_id), Some(&bob_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Likeable"));

    let (status, _) = app
        .post(&format!("/posts/{}/like", post_id), Some(&bob_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .delete(&format!("/posts/{}/like", post_id), Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(&format!("/posts/{}/like", post_id), Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_like_unknown_post() {
    let app = TestApp::spawn();
    app.register("bob", "pass_word!").await;
    let token = app.login("bob", "pass_word!").await;

    let (status, _) = app.post("/posts/42/like", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_and_unfollow() {
    let app = TestApp::spawn();
    let alice = app.register("alice", "pass_word!").await;
    let bob = app.register("bob", "pass_word!").await;
    let alice_token = app.login("alice", "pass_word!").await;
    let alice_id = alice["id"].as_i64().unwrap();
    let bob_id = bob["id"].as_i64().unwrap();

    let (status, body) = app
        .post(&format!("/users/{}/follow", bob_id), Some(&alice_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["following_count"], 1);
    assert_eq!(body["data"]["followers_count"], 1);

    // Following twice is an error.
    let (status, _) = app
        .post(&format!("/users/{}/follow", bob_id), Some(&alice_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Following yourself is an error.
    let (status, _) = app
        .post(
            &format!("/users/{}/follow", alice_id),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Follower listings are public.
    let (status, body) = app
        .get(&format!("/users/{}/followers", bob_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["followers_count"], 1);
    assert_eq!(body["data"]["followers"][0]["username"], "alice");

    let (status, body) = app
        .delete(&format!("/users/{}/follow", bob_id), Some(&alice_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["followers_count"], 0);

    // Unfollowing without a follow is an error.
    let (status, _) = app
        .delete(&format!("/users/{}/follow", bob_id), Some(&alice_token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let app = TestApp::spawn();
    app.register("alice", "pass_word!").await;
    let token = app.login("alice", "pass_word!").await;

    let (status, _) = app.post("/users/9999/follow", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_users_lists_follower_counts() {
    let app = TestApp::spawn();
    let bob = app.register("bob", "pass_word!").await;
    app.register("alice", "pass_word!").await;
    let alice_token = app.login("alice", "pass_word!").await;

    app.post(
        &format!("/users/{}/follow", bob["id"].as_i64().unwrap()),
        Some(&alice_token),
        None,
    )
    .await;

    let (status, body) = app.get("/feed/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    let bob_entry = users
        .iter()
        .find(|u| u["username"] == "bob")
        .expect("bob missing from feed");
    assert_eq!(bob_entry["followers_count"], 1);
}

#[tokio::test]
async fn test_feed_posts_for_unknown_user() {
    let app = TestApp::spawn();

    let (status, _) = app.get("/feed/posts/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"].as_str().unwrap().contains("UP"));
}
