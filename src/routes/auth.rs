//! Authentication route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{current_user, login, logout, refresh_token, register};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh_token))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(current_user))
}
