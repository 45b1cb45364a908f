//! User types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Language used when a user has not picked one
pub const DEFAULT_LANGUAGE: &str = "en";

/// User account
///
/// Reserved for a future auth layer: the table exists but no handler reads or
/// writes it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "PasswordHash", skip_serializing, default)]
    pub password_hash: String,
    #[serde(rename = "Language", default = "default_language")]
    pub language: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            language: default_language(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_to_english() {
        let user = User::new("alice".to_string(), "hash".to_string());
        assert_eq!(user.language, "en");
        assert!(!user.id.is_nil());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new("alice".to_string(), "secret-hash".to_string());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"Username\":\"alice\""));
    }
}
