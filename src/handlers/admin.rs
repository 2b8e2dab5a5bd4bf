//! Superadmin HTTP handlers - system overview and user management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::SuperAdminUser;
use crate::models::{SystemStats, UpdateUserRequest, UserResponse};
use crate::state::AppState;

/// GET /api/admin/stats - Dashboard overview numbers
pub async fn system_stats(
    State(state): State<AppState>,
    SuperAdminUser(_): SuperAdminUser,
) -> Result<Json<SystemStats>, ApiError> {
    let stats = state.lottery_service.system_stats().await?;
    Ok(Json(stats))
}

/// GET /api/admin/users - List all accounts
pub async fn list_users(
    State(state): State<AppState>,
    SuperAdminUser(_): SuperAdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.auth_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PATCH /api/admin/users/:id - Approve, suspend, or re-role an account
pub async fn update_user(
    State(state): State<AppState>,
    SuperAdminUser(_): SuperAdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .auth_service
        .update_user(id, req.role, req.status, req.name)
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /api/admin/users/:id - Remove an account
pub async fn delete_user(
    State(state): State<AppState>,
    SuperAdminUser(acting): SuperAdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if acting.user_id == id {
        return Err(ApiError::ValidationError(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.auth_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
