use serde::{Deserialize, Serialize};

/// A registered account. The password is only ever held as an argon2 PHC string
/// and is never serialized back to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Equality filter over user documents. Unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl UserFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.id.as_deref().is_none_or(|id| user.id == id)
            && self.email.as_deref().is_none_or(|email| user.email == email)
            && self
                .username
                .as_deref()
                .is_none_or(|username| user.username == username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: "user-1".to_string(),
            username: "alice_wonder".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(UserFilter::default().matches(&alice()));
    }

    #[test]
    fn test_filter_fields_are_conjunctive() {
        let filter = UserFilter {
            email: Some("alice@example.com".to_string()),
            username: Some("someone_else".to_string()),
            ..UserFilter::default()
        };
        assert!(!filter.matches(&alice()));
        assert!(UserFilter::by_email("alice@example.com").matches(&alice()));
        assert!(!UserFilter::by_id("user-2").matches(&alice()));
    }

    #[test]
    fn test_serialized_user_never_contains_password_hash() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["_id"], "user-1");
        assert_eq!(json["username"], "alice_wonder");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }
}
