//! Middleware for the PUKATU API
//!
//! Request tracing, rate limiting, security headers, and the
//! authentication extractors.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{AdminUser, AuthenticatedUser, SuperAdminUser};
pub use rate_limiter::{rate_limit, RateLimiter};
pub use security::security_headers;
pub use tracing::request_tracing;
