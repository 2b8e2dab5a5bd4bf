//! Purchase route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    confirm_purchase, my_purchases, pending_purchases, reject_purchase, submit_purchase,
};
use crate::state::AppState;

pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/api/purchases", post(submit_purchase))
        .route("/api/purchases/pending", get(pending_purchases))
        .route("/api/purchases/:id/confirm", post(confirm_purchase))
        .route("/api/purchases/:id/reject", post(reject_purchase))
        .route("/api/my/purchases", get(my_purchases))
}
