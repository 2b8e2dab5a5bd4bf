//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::lottery::LotteryService;
use crate::lucky::LuckyClient;
use crate::purchase::PurchaseService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: Arc<AuthService>,
    pub lottery_service: Arc<LotteryService>,
    pub purchase_service: Arc<PurchaseService>,
    pub lucky_client: LuckyClient,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        auth_service: Arc<AuthService>,
        lottery_service: Arc<LotteryService>,
        purchase_service: Arc<PurchaseService>,
        lucky_client: LuckyClient,
    ) -> Self {
        Self {
            db_pool,
            auth_service,
            lottery_service,
            purchase_service,
            lucky_client,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<LotteryService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.lottery_service.clone()
    }
}

impl FromRef<AppState> for Arc<PurchaseService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.purchase_service.clone()
    }
}
