//! Lottery route definitions

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{
    create_lottery, delete_lottery, get_lottery, list_active_lotteries, lucky_numbers,
    my_lotteries, run_draw, toggle_lottery_status,
};
use crate::state::AppState;

pub fn lottery_routes() -> Router<AppState> {
    Router::new()
        .route("/api/lotteries", get(list_active_lotteries))
        .route("/api/lotteries", post(create_lottery))
        .route("/api/lotteries/:id", get(get_lottery))
        .route("/api/lotteries/:id", delete(delete_lottery))
        .route("/api/lotteries/:id/toggle", post(toggle_lottery_status))
        .route("/api/lotteries/:id/draw", post(run_draw))
        .route("/api/lotteries/:id/lucky", post(lucky_numbers))
        .route("/api/my/lotteries", get(my_lotteries))
}
