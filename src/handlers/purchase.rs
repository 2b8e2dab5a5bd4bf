//! Purchase HTTP handlers - the buy flow and the admin payment queue

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::purchase::{PendingPurchase, Purchase, SubmitPurchaseRequest, SubmitPurchaseResponse};
use crate::state::AppState;

/// POST /api/purchases - Reserve numbers and create a pending purchase
pub async fn submit_purchase(
    State(state): State<AppState>,
    Json(req): Json<SubmitPurchaseRequest>,
) -> Result<(StatusCode, Json<SubmitPurchaseResponse>), ApiError> {
    req.validate()?;

    let reserved = state.purchase_service.reserve(req).await?;
    Ok((StatusCode::CREATED, Json(reserved)))
}

/// GET /api/purchases/pending - Admin queue, scoped to owned lotteries
pub async fn pending_purchases(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> Result<Json<Vec<PendingPurchase>>, ApiError> {
    let pending = state.purchase_service.list_pending(&user.actor()).await?;
    Ok(Json(pending))
}

/// POST /api/purchases/:id/confirm - Mark payment received
pub async fn confirm_purchase(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.purchase_service.confirm(id, &user.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/purchases/:id/reject - Reject and release the numbers
pub async fn reject_purchase(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.purchase_service.reject(id, &user.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/my/purchases - Purchases made under the caller's contact
pub async fn my_purchases(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Purchase>>, ApiError> {
    let purchases = state.purchase_service.list_for_contact(&user.email).await?;
    Ok(Json(purchases))
}
