//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Maps between the database schema and the domain User entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{User, UserRepository, UserType};
use crate::shared::error::AppError;

/// Database row representation matching the users table schema.
/// The user_type column is a plain VARCHAR, mapped to the enum on the way out.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: String,
    email: String,
    password_hash: String,
    full_name: String,
    user_type: String,
    phone: Option<String>,
    country: Option<String>,
    timezone: Option<String>,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            user_type: UserType::from_str(&self.user_type),
            phone: self.phone,
            country: self.country,
            timezone: self.timezone,
            avatar_url: self.avatar_url,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    /// Find a user by their string id.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, full_name, user_type,
                   phone, country, timezone, avatar_url, is_active, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, full_name, user_type,
                   phone, country, timezone, avatar_url, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (user_id, email, password_hash, full_name, user_type,
                               phone, country, timezone, avatar_url, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING user_id, email, password_hash, full_name, user_type,
                      phone, country, timezone, avatar_url, is_active, created_at
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.user_type.as_str())
        .bind(&user.phone)
        .bind(&user.country)
        .bind(&user.timezone)
        .bind(&user.avatar_url)
        .bind(user.is_active)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user())
    }

    /// Full-row update keyed by user_id.
    async fn update(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, full_name = $4, user_type = $5,
                phone = $6, country = $7, timezone = $8, avatar_url = $9, is_active = $10
            WHERE user_id = $1
            RETURNING user_id, email, password_hash, full_name, user_type,
                      phone, country, timezone, avatar_url, is_active, created_at
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.user_type.as_str())
        .bind(&user.phone)
        .bind(&user.country)
        .bind(&user.timezone)
        .bind(&user.avatar_url)
        .bind(user.is_active)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }
}
