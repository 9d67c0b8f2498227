//! Account model.
//!
//! # Invariants
//! - `email` is unique across accounts (enforced by the schema).
//! - `password_hash` is opaque here and never serialized.

use serde::{Deserialize, Serialize};

/// Database identifier of an account.
pub type UserId = i64;

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Caller-produced credential digest; compared, never interpreted.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Trims and lowercases an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check; deliverability is not our concern.
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_plausible_email, normalize_email, User};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn plausible_email_requires_both_sides_of_at() {
        assert!(is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b"));
        assert!(!is_plausible_email("a@"));
        assert!(!is_plausible_email("ab"));
        assert!(!is_plausible_email("a b@c"));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User::new(7, "alice@example.com", "hash123");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hash123"));
        assert!(json.contains("alice@example.com"));
    }
}
