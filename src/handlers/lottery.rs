//! Lottery HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::lottery::{
    CreateLotteryRequest, DrawResponse, Lottery, LuckyNumbersRequest, LuckyNumbersResponse,
};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::state::AppState;
use crate::tickets::TicketGrid;

const DEFAULT_LUCKY_COUNT: usize = 5;

/// GET /api/lotteries - Storefront listing of active raffles
pub async fn list_active_lotteries(
    State(state): State<AppState>,
) -> Result<Json<Vec<Lottery>>, ApiError> {
    let lotteries = state.lottery_service.list_active().await?;
    Ok(Json(lotteries))
}

/// GET /api/lotteries/:id - Single raffle, with its current sold set
pub async fn get_lottery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lottery>, ApiError> {
    let lottery = state.lottery_service.get(id).await?;
    Ok(Json(lottery))
}

/// GET /api/my/lotteries - Role-scoped listing for the dashboard
pub async fn my_lotteries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Lottery>>, ApiError> {
    let lotteries = state
        .lottery_service
        .list_for_user(&user.actor(), &user.email)
        .await?;
    Ok(Json(lotteries))
}

/// POST /api/lotteries - Create a raffle
pub async fn create_lottery(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(req): Json<CreateLotteryRequest>,
) -> Result<(StatusCode, Json<Lottery>), ApiError> {
    req.validate()?;

    let lottery = state.lottery_service.create(req, &user.actor()).await?;
    Ok((StatusCode::CREATED, Json(lottery)))
}

/// POST /api/lotteries/:id/toggle - Pause or resume a raffle
pub async fn toggle_lottery_status(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Lottery>, ApiError> {
    let lottery = state
        .lottery_service
        .toggle_status(id, &user.actor())
        .await?;
    Ok(Json(lottery))
}

/// DELETE /api/lotteries/:id - Delete a raffle (irreversible)
pub async fn delete_lottery(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.lottery_service.delete(id, &user.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/lotteries/:id/draw - Run the draw and complete the raffle
pub async fn run_draw(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DrawResponse>, ApiError> {
    let lottery = state.lottery_service.run_draw(id, &user.actor()).await?;

    // The draw is committed; the narrative is decoration. The client
    // always falls back to a templated string, and a failure to persist
    // it is only logged.
    let winning_number = lottery
        .winning_number
        .ok_or_else(|| ApiError::InternalError("Draw committed without a winner".to_string()))?;

    let narrative = state
        .lucky_client
        .draw_narrative(&lottery.title, &lottery.prize, winning_number)
        .await;

    if let Err(e) = state.lottery_service.attach_narrative(id, &narrative).await {
        tracing::error!(lottery_id = %id, error = %e, "Failed to store draw narrative");
    }

    Ok(Json(DrawResponse {
        lottery_id: id,
        winning_number,
        narrative,
    }))
}

/// POST /api/lotteries/:id/lucky - Suggest numbers from the available set
pub async fn lucky_numbers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LuckyNumbersRequest>,
) -> Result<Json<LuckyNumbersResponse>, ApiError> {
    req.validate()?;

    let lottery = state.lottery_service.get(id).await?;
    let grid = TicketGrid::new(lottery.total_numbers, &lottery.sold_numbers);
    let available = grid.available();

    if available.is_empty() {
        return Err(ApiError::ValidationError(
            "No numbers left to suggest".to_string(),
        ));
    }

    let count = req.count.unwrap_or(DEFAULT_LUCKY_COUNT as u32) as usize;
    let numbers = state
        .lucky_client
        .suggest_numbers(&lottery.title, &available, count)
        .await;

    Ok(Json(LuckyNumbersResponse { numbers }))
}
