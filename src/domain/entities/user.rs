//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// User type enum matching database VARCHAR constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Student,
    Counselor,
    Admin,
}

impl UserType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "counselor" => Self::Counselor,
            "admin" => Self::Admin,
            _ => Self::Student,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Counselor => "counselor",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a platform account (student, counselor, or admin).
///
/// Maps to the `users` table. The `user_id` is a prefixed string id
/// (`user_<hex>`) and serves as the identity key for presence tracking
/// and realtime delivery targeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Prefixed string id (primary key)
    pub user_id: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Full display name
    pub full_name: String,

    /// Account role
    pub user_type: UserType,

    /// Contact phone number
    pub phone: Option<String>,

    /// Country of residence
    pub country: Option<String>,

    /// Preferred timezone (IANA name)
    pub timezone: Option<String>,

    /// URL to the user's avatar image
    pub avatar_url: Option<String>,

    /// Whether the account can log in
    pub is_active: bool,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their string id.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update an existing user (full-row update keyed by user_id).
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_from_str() {
        assert_eq!(UserType::from_str("student"), UserType::Student);
        assert_eq!(UserType::from_str("COUNSELOR"), UserType::Counselor);
        assert_eq!(UserType::from_str("admin"), UserType::Admin);
    }

    #[test]
    fn test_user_type_from_str_unknown_defaults_to_student() {
        assert_eq!(UserType::from_str(""), UserType::Student);
        assert_eq!(UserType::from_str("robot"), UserType::Student);
    }

    #[test]
    fn test_user_type_as_str_roundtrip() {
        for user_type in [UserType::Student, UserType::Counselor, UserType::Admin] {
            assert_eq!(UserType::from_str(user_type.as_str()), user_type);
        }
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            user_id: "user_abc123def456".into(),
            email: "test@example.com".into(),
            password_hash: "secret_hash".into(),
            full_name: "Test User".into(),
            user_type: UserType::Student,
            phone: None,
            country: None,
            timezone: None,
            avatar_url: None,
            is_active: true,
            created_at: Utc::now(),
        };

        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("secret_hash"));
        assert!(serialized.contains("\"user_type\":\"student\""));
    }
}
