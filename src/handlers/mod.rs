//! HTTP handlers for the PUKATU API

mod admin;
mod auth;
mod lottery;
mod purchase;

pub use admin::*;
pub use auth::*;
pub use lottery::*;
pub use purchase::*;
