//! Purchase domain module
//!
//! The reservation protocol: transactional number reservation, the
//! manual payment confirmation/rejection step, and expiry of purchases
//! that were never confirmed.

mod expiry;
mod model;
mod service;

pub use expiry::pending_expiry_sweeper;
pub use model::*;
pub use service::{PurchaseError, PurchaseService};
