use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access-token claim set.
///
/// `sub` carries the username and `id` the numeric user id; a token resolves
/// to an identity only when both are present. `exp` and `iat` are Unix
/// timestamps. Fields are optional so that partially formed tokens decode
/// far enough to be rejected with a precise reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Subject user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated user with an absolute expiry of
    /// now + `ttl_minutes`.
    pub fn for_user(user_id: i64, username: &str, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::minutes(ttl_minutes);

        Self {
            sub: Some(username.to_string()),
            id: Some(user_id),
            exp: Some(expiration.timestamp()),
            iat: Some(now.timestamp()),
        }
    }

    /// Set subject username.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set subject user id.
    pub fn with_user_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Subject username, if present.
    pub fn username(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Subject user id, if present.
    pub fn user_id(&self) -> Option<i64> {
        self.id
    }
}

impl Default for Claims {
    fn default() -> Self {
        Self {
            sub: None,
            id: None,
            exp: None,
            iat: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user(42, "alice", 60);

        assert_eq!(claims.username(), Some("alice"));
        assert_eq!(claims.user_id(), Some(42));

        let exp = claims.exp.unwrap();
        let iat = claims.iat.unwrap();
        assert_eq!(exp - iat, 60 * 60);
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("bob")
            .with_user_id(7)
            .with_expiration(1234567890)
            .with_issued_at(1234567800);

        assert_eq!(claims.sub, Some("bob".to_string()));
        assert_eq!(claims.id, Some(7));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.iat, Some(1234567800));
    }

    #[test]
    fn test_empty_claims_have_no_subject() {
        let claims = Claims::new();
        assert_eq!(claims.username(), None);
        assert_eq!(claims.user_id(), None);
    }
}
