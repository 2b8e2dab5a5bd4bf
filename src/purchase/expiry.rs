//! Pending-purchase expiry sweeper
//!
//! Numbers reserved by a purchase that is never confirmed or rejected
//! would stay soft-locked forever. This background task auto-rejects
//! purchases that sat pending longer than the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use super::PurchaseService;

const SWEEP_INTERVAL_SECS: u64 = 600;

/// Run forever, expiring stale pending purchases every sweep interval.
/// Spawned from main when `PENDING_PURCHASE_TTL_HOURS` is non-zero.
pub async fn pending_expiry_sweeper(service: Arc<PurchaseService>, ttl_hours: i64) {
    tracing::info!(ttl_hours, "Pending-purchase expiry sweeper started");

    loop {
        match service.expire_stale(ttl_hours).await {
            Ok(0) => {}
            Ok(expired) => {
                tracing::info!(expired, "Expired stale pending purchases");
            }
            Err(e) => {
                tracing::error!(error = %e, "Expiry sweep failed");
            }
        }

        tokio::time::sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
    }
}
