//! Route definitions for the PUKATU API

mod admin;
mod auth;
mod lottery;
mod purchase;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use lottery::lottery_routes;
pub use purchase::purchase_routes;
