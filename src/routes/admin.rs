//! Superadmin route definitions

use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::handlers::{delete_user, list_users, system_stats, update_user};
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(system_stats))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id", patch(update_user))
        .route("/api/admin/users/:id", delete(delete_user))
}
