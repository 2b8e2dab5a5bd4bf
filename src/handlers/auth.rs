//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    AuthTokensResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse,
};
use crate::state::AppState;

/// POST /api/auth/register - Self-registration
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthTokensResponse>), ApiError> {
    req.validate()?;

    let tokens = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /api/auth/login - Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    req.validate()?;

    let tokens = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// POST /api/auth/refresh - Refresh access token using refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    let tokens = state.auth_service.refresh_tokens(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /api/auth/logout - Revoke current session
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state.auth_service.revoke_session(&user.jti).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me - Get current authenticated user
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.get_user_by_id(user.user_id).await?;
    Ok(Json(user.into()))
}
