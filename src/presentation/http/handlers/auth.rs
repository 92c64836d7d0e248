//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use crate::application::dto::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest,
};
use crate::application::services::{AuthError, AuthService};
use crate::domain::User;
use crate::infrastructure::repositories::PgUserRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.settings.jwt.clone(),
    )
}

fn map_auth_err(e: AuthError) -> AppError {
    match e {
        AuthError::InvalidCredentials => AppError::Unauthorized("Invalid email or password".into()),
        AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
        AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
        AuthError::UserNotFound => AppError::NotFound("User not found".into()),
        AuthError::EmailExists => AppError::Conflict("Email already exists".into()),
        AuthError::AccountDeactivated => AppError::Forbidden("Account is deactivated".into()),
        AuthError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = auth_service(&state)
        .register(body)
        .await
        .map_err(map_auth_err)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token, user })))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = auth_service(&state)
        .login(&body.email, &body.password)
        .await
        .map_err(map_auth_err)?;

    Ok(Json(TokenResponse { token, user }))
}

/// Get the authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = auth_service(&state)
        .get_user(&auth_user.user_id)
        .await
        .map_err(map_auth_err)?;

    Ok(Json(user))
}

/// Update the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = auth_service(&state)
        .update_profile(&auth_user.user_id, body)
        .await
        .map_err(map_auth_err)?;

    Ok(Json(user))
}

/// Change the authenticated user's password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    auth_service(&state)
        .change_password(&auth_user.user_id, body)
        .await
        .map_err(map_auth_err)?;

    Ok(StatusCode::NO_CONTENT)
}
