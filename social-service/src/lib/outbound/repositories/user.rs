use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSummary;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_user(row: &PgRow) -> Result<User, UserError> {
        let id: i64 = row.try_get("id").map_err(db_err)?;
        let username: String = row.try_get("username").map_err(db_err)?;
        let email: String = row.try_get("email").map_err(db_err)?;
        let password_hash: String = row.try_get("password_hash").map_err(db_err)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_err)?;

        Ok(User {
            id: UserId(id),
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password_hash,
            created_at,
        })
    }
}

fn db_err(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_username_key") {
                        return UserError::UsernameAlreadyExists(
                            user.username.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                    }
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Self::map_user(&row)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::map_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::map_user).transpose()
    }

    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(follower.0)
        .bind(followee.0)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn unfollow(&self, follower: &UserId, followee: &UserId) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND followee_id = $2
            "#,
        )
        .bind(follower.0)
        .bind(followee.0)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn followers(&self, id: &UserId) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.created_at
            FROM users u
            JOIN follows f ON f.follower_id = u.id
            WHERE f.followee_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(Self::map_user).collect()
    }

    async fn following(&self, id: &UserId) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.created_at
            FROM users u
            JOIN follows f ON f.followee_id = u.id
            WHERE f.follower_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(Self::map_user).collect()
    }

    async fn count_followers(&self, id: &UserId) -> Result<i64, UserError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM follows
            WHERE followee_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_get("count").map_err(db_err)
    }

    async fn count_following(&self, id: &UserId) -> Result<i64, UserError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM follows
            WHERE follower_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_get("count").map_err(db_err)
    }

    async fn sample_with_follower_counts(
        &self,
        count: i64,
    ) -> Result<Vec<UserSummary>, UserError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, COUNT(f.follower_id) AS followers_count
            FROM users u
            LEFT JOIN follows f ON f.followee_id = u.id
            GROUP BY u.id, u.username
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(count)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id").map_err(db_err)?;
                let username: String = row.try_get("username").map_err(db_err)?;
                let followers_count: i64 = row.try_get("followers_count").map_err(db_err)?;

                Ok(UserSummary {
                    id: UserId(id),
                    username: Username::new(username)?,
                    followers_count,
                })
            })
            .collect()
    }
}
