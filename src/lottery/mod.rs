//! Lottery domain module
//!
//! Raffle lifecycle: creation, role-scoped listing, pause/resume,
//! deletion, and the irreversible winner draw.

mod model;
mod service;

pub use model::*;
pub use service::{LotteryError, LotteryService};
