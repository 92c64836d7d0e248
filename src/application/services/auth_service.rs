//! Authentication Service
//!
//! User registration, login, profile updates, and JWT issuance. Tokens are
//! single long-lived bearer JWTs; there is no refresh token machinery.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::dto::{ChangePasswordRequest, RegisterRequest, UpdateProfileRequest};
use crate::config::JwtSettings;
use crate::domain::{User, UserRepository, UserType};
use crate::shared::id::prefixed_id;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// User email
    pub email: String,
    /// Account role string
    pub user_type: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Authentication service
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_settings: JwtSettings,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            jwt_settings,
        }
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Issue a signed JWT for a user
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.jwt_settings.expiry_hours);

        let claims = Claims {
            sub: user.user_id.clone(),
            email: user.email.clone(),
            user_type: user.user_type.as_str().to_string(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Decode and validate a bearer token
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }

    /// Register a new account and issue its first token.
    pub async fn register(&self, request: RegisterRequest) -> Result<(User, String), AuthError> {
        if self
            .user_repo
            .email_exists(&request.email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            return Err(AuthError::EmailExists);
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = User {
            user_id: prefixed_id("user"),
            email: request.email,
            password_hash,
            full_name: request.full_name,
            user_type: request
                .user_type
                .as_deref()
                .map(UserType::from_str)
                .unwrap_or_default(),
            phone: request.phone,
            country: request.country,
            timezone: request.timezone,
            avatar_url: None,
            is_active: true,
            created_at: Utc::now(),
        };

        let created = self
            .user_repo
            .create(&user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let token = self.generate_token(&created)?;
        Ok((created, token))
    }

    /// Authenticate credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let token = self.generate_token(&user)?;
        Ok((user, token))
    }

    /// Fetch the account behind a user id.
    pub async fn get_user(&self, user_id: &str) -> Result<User, AuthError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply profile changes; only the provided fields are touched.
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        let mut user = self.get_user(user_id).await?;

        if let Some(full_name) = request.full_name {
            user.full_name = full_name;
        }
        if let Some(phone) = request.phone {
            user.phone = Some(phone);
        }
        if let Some(country) = request.country {
            user.country = Some(country);
        }
        if let Some(timezone) = request.timezone {
            user.timezone = Some(timezone);
        }
        if let Some(avatar_url) = request.avatar_url {
            user.avatar_url = Some(avatar_url);
        }

        self.user_repo
            .update(&user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Change password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        let mut user = self.get_user(user_id).await?;

        if !self.verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        user.password_hash = self.hash_password(&request.new_password)?;
        self.user_repo
            .update(&user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }
}
