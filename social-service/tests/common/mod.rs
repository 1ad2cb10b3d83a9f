use std::collections::HashSet;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use serde_json::json;
use serde_json::Value;
use social_service::domain::post::errors::PostError;
use social_service::domain::post::models::NewPost;
use social_service::domain::post::models::Post;
use social_service::domain::post::models::PostId;
use social_service::domain::post::ports::PostRepository;
use social_service::domain::post::ports::PostServicePort;
use social_service::domain::post::service::PostService;
use social_service::domain::user::errors::UserError;
use social_service::domain::user::models::NewUser;
use social_service::domain::user::models::User;
use social_service::domain::user::models::UserId;
use social_service::domain::user::models::UserSummary;
use social_service::domain::user::models::Username;
use social_service::domain::user::ports::UserRepository;
use social_service::domain::user::ports::UserServicePort;
use social_service::domain::user::service::UserService;
use social_service::inbound::http::router::create_router;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory user store mirroring the behavior of the Postgres repository.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    follows: Mutex<HashSet<(i64, i64)>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            follows: Mutex::new(HashSet::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let created = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == *username).cloned())
    }

    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<bool, UserError> {
        let mut follows = self.follows.lock().unwrap();
        Ok(follows.insert((follower.0, followee.0)))
    }

    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<bool, UserError> {
        let mut follows = self.follows.lock().unwrap();
        Ok(follows.remove(&(follower.0, followee.0)))
    }

    async fn followers(&self, id: &UserId) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().unwrap();
        let follows = self.follows.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| follows.contains(&(u.id.0, id.0)))
            .cloned()
            .collect())
    }

    async fn following(&self, id: &UserId) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().unwrap();
        let follows = self.follows.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| follows.contains(&(id.0, u.id.0)))
            .cloned()
            .collect())
    }

    async fn count_followers(&self, id: &UserId) -> Result<i64, UserError> {
        let follows = self.follows.lock().unwrap();
        Ok(follows.iter().filter(|(_, f)| *f == id.0).count() as i64)
    }

    async fn count_following(&self, id: &UserId) -> Result<i64, UserError> {
        let follows = self.follows.lock().unwrap();
        Ok(follows.iter().filter(|(f, _)| *f == id.0).count() as i64)
    }

    async fn sample_with_follower_counts(
        &self,
        count: i64,
    ) -> Result<Vec<UserSummary>, UserError> {
        let users = self.users.lock().unwrap();
        let follows = self.follows.lock().unwrap();
        Ok(users
            .iter()
            .take(count as usize)
            .map(|u| UserSummary {
                id: u.id,
                username: u.username.clone(),
                followers_count: follows.iter().filter(|(_, f)| *f == u.id.0).count() as i64,
            })
            .collect())
    }
}

/// In-memory post store mirroring the behavior of the Postgres repository.
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
    likes: Mutex<HashSet<(i64, i64)>>,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            likes: Mutex::new(HashSet::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().unwrap();

        let created = Post {
            id: PostId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
        };
        posts.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == *id).cloned())
    }

    async fn find_by_author(&self, author: &UserId) -> Result<Vec<Post>, PostError> {
        let posts = self.posts.lock().unwrap();
        let mut by_author: Vec<Post> = posts
            .iter()
            .filter(|p| p.author_id == *author)
            .cloned()
            .collect();
        by_author.reverse();
        Ok(by_author)
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(post)
            }
            None => Err(PostError::NotFound(post.id.to_string())),
        }
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != *id);
        Ok(posts.len() < before)
    }

    async fn like(&self, user: &UserId, post: &PostId) -> Result<bool, PostError> {
        let mut likes = self.likes.lock().unwrap();
        Ok(likes.insert((user.0, post.0)))
    }

    async fn unlike(&self, user: &UserId, post: &PostId) -> Result<bool, PostError> {
        let mut likes = self.likes.lock().unwrap();
        Ok(likes.remove(&(user.0, post.0)))
    }
}

/// Test application that drives the real router in-process.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn spawn() -> Self {
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let post_repository = Arc::new(InMemoryPostRepository::new());

        let user_service: Arc<dyn UserServicePort> =
            Arc::new(UserService::new(user_repository, PasswordHasher::new()));
        let post_service: Arc<dyn PostServicePort> =
            Arc::new(PostService::new(post_repository));
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));

        let router = create_router(user_service, post_service, authenticator, 60);

        Self { router }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    /// GET with a verbatim Authorization header value.
    pub async fn get_with_auth_header(
        &self,
        uri: &str,
        header_value: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("authorization", header_value)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        (status, json)
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, body).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        (status, json)
    }

    /// Register a user and return the response data.
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .post(
                "/users/register",
                None,
                Some(json!({
                    "username": username,
                    "email_address": format!("{}@example.com", username),
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
        body["data"].clone()
    }

    /// Log in and return the access token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/token",
                None,
                Some(json!({
                    "username": username,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}
