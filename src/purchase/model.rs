//! Purchase models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Purchase model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Purchase {
    pub id: Uuid,
    pub lottery_id: Uuid,
    pub buyer_name: String,
    pub buyer_contact: String,
    /// Numbers in the order the buyer picked them
    pub numbers: Vec<i32>,
    pub total_amount_cents: i64,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purchase lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "purchase_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// Admin action on a pending purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseAction {
    Confirm,
    Reject,
}

/// Outcome of applying an action to a purchase in a given state.
///
/// Confirm and reject are terminal and idempotent: repeating the action
/// that already happened is a no-op, while crossing actions (confirming
/// a rejected purchase or vice versa) is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    AlreadyApplied,
    Invalid,
}

impl PurchaseStatus {
    pub fn transition(self, action: PurchaseAction) -> TransitionOutcome {
        match (self, action) {
            (PurchaseStatus::Pending, _) => TransitionOutcome::Applied,
            (PurchaseStatus::Confirmed, PurchaseAction::Confirm) => {
                TransitionOutcome::AlreadyApplied
            }
            (PurchaseStatus::Rejected, PurchaseAction::Reject) => TransitionOutcome::AlreadyApplied,
            (PurchaseStatus::Confirmed, PurchaseAction::Reject) => TransitionOutcome::Invalid,
            (PurchaseStatus::Rejected, PurchaseAction::Confirm) => TransitionOutcome::Invalid,
        }
    }
}

/// Request DTO for submitting a purchase. The total is deliberately
/// absent: the server recomputes it from the lottery's price.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitPurchaseRequest {
    pub lottery_id: Uuid,
    #[validate(length(min = 2, max = 120))]
    pub buyer_name: String,
    /// Phone or email used as the payment-confirmation channel
    #[validate(length(min = 5, max = 120))]
    pub buyer_contact: String,
    #[validate(length(min = 1, max = 1000))]
    pub numbers: Vec<i32>,
}

/// Response DTO after a successful reservation. Carries everything the
/// storefront needs for the WhatsApp handoff without recomputing.
#[derive(Debug, Serialize)]
pub struct SubmitPurchaseResponse {
    pub purchase_id: Uuid,
    pub contact_phone: String,
    pub total_amount_cents: i64,
    pub message: String,
    pub whatsapp_url: String,
}

/// Pending purchase joined with its lottery title, for the admin queue
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PendingPurchase {
    pub id: Uuid,
    pub lottery_id: Uuid,
    pub lottery_title: String,
    pub buyer_name: String,
    pub buyer_contact: String,
    pub numbers: Vec<i32>,
    pub total_amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions_apply() {
        assert_eq!(
            PurchaseStatus::Pending.transition(PurchaseAction::Confirm),
            TransitionOutcome::Applied
        );
        assert_eq!(
            PurchaseStatus::Pending.transition(PurchaseAction::Reject),
            TransitionOutcome::Applied
        );
    }

    #[test]
    fn test_repeat_action_is_idempotent() {
        assert_eq!(
            PurchaseStatus::Confirmed.transition(PurchaseAction::Confirm),
            TransitionOutcome::AlreadyApplied
        );
        assert_eq!(
            PurchaseStatus::Rejected.transition(PurchaseAction::Reject),
            TransitionOutcome::AlreadyApplied
        );
    }

    #[test]
    fn test_crossing_terminal_states_is_invalid() {
        assert_eq!(
            PurchaseStatus::Confirmed.transition(PurchaseAction::Reject),
            TransitionOutcome::Invalid
        );
        assert_eq!(
            PurchaseStatus::Rejected.transition(PurchaseAction::Confirm),
            TransitionOutcome::Invalid
        );
    }
}
