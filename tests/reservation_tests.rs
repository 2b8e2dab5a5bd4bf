//! Reservation Protocol Tests
//!
//! Validates the sold-number ledger, the purchase state machine, the
//! draw rule, and the confirmation handoff payload against the core
//! consistency properties: no double-sale, exact release on rejection,
//! idempotent reconciliation, and single-shot draws.

use pukatu_server::purchase::{PurchaseAction, PurchaseStatus, TransitionOutcome};
use pukatu_server::tickets::ledger::{pick_winner, release, reserve};
use pukatu_server::tickets::{ConfirmationMessage, LedgerError};

// ============================================================================
// Reservation / No-Double-Sale Tests
// ============================================================================

#[test]
fn test_reserve_adds_numbers_to_sold_set() {
    let sold = reserve(&[], &[3, 4], 10).unwrap();
    assert_eq!(sold, vec![3, 4]);
}

#[test]
fn test_concurrent_overlap_exactly_one_wins() {
    // Buyer A submits [3, 4]; buyer B submits [4, 5]. The row lock
    // serializes them: whoever commits second sees the updated set.
    let after_a = reserve(&[], &[3, 4], 10).unwrap();

    let b_result = reserve(&after_a, &[4, 5], 10);
    assert_eq!(b_result, Err(LedgerError::Unavailable(vec![4])));

    // Number 4 belongs to exactly one purchase; B can retry without it.
    let after_b_retry = reserve(&after_a, &[5], 10).unwrap();
    assert_eq!(after_b_retry, vec![3, 4, 5]);
}

#[test]
fn test_sold_set_equals_union_of_live_purchases() {
    let purchases = [vec![1, 2], vec![7], vec![5, 9, 3]];

    let mut sold: Vec<i32> = Vec::new();
    for numbers in &purchases {
        sold = reserve(&sold, numbers, 10).unwrap();
    }

    let mut expected: Vec<i32> = purchases.iter().flatten().copied().collect();
    expected.sort_unstable();
    assert_eq!(sold, expected);

    // No number may resolve to two different live purchases.
    for (i, a) in purchases.iter().enumerate() {
        for b in purchases.iter().skip(i + 1) {
            assert!(a.iter().all(|n| !b.contains(n)));
        }
    }
}

#[test]
fn test_whole_reservation_fails_on_any_conflict() {
    let sold = vec![2, 4, 6];
    let err = reserve(&sold, &[1, 2, 3, 4], 10).unwrap_err();
    assert_eq!(err, LedgerError::Unavailable(vec![2, 4]));
    // Nothing was partially written: the caller still holds the old set.
    assert_eq!(sold, vec![2, 4, 6]);
}

// ============================================================================
// Rejection / Release Tests
// ============================================================================

#[test]
fn test_reject_releases_exactly_its_numbers() {
    // P1 holds [3, 4], P2 holds [8].
    let sold = reserve(&[], &[3, 4], 10).unwrap();
    let sold = reserve(&sold, &[8], 10).unwrap();

    // Rejecting P1 releases 3 and 4 and nothing else.
    let sold = release(&sold, &[3, 4]);
    assert_eq!(sold, vec![8]);
}

#[test]
fn test_reject_then_resell() {
    // P1 reserves [3, 4] and is rejected.
    let sold = reserve(&[], &[3, 4], 10).unwrap();
    let sold = release(&sold, &[3, 4]);
    assert!(sold.is_empty());

    // A new buyer picks the same numbers as P2.
    let sold = reserve(&sold, &[3, 4], 10).unwrap();
    assert_eq!(sold, vec![3, 4]);
}

// ============================================================================
// Reconciliation State Machine Tests
// ============================================================================

#[test]
fn test_confirm_is_idempotent() {
    assert_eq!(
        PurchaseStatus::Pending.transition(PurchaseAction::Confirm),
        TransitionOutcome::Applied
    );
    assert_eq!(
        PurchaseStatus::Confirmed.transition(PurchaseAction::Confirm),
        TransitionOutcome::AlreadyApplied
    );
}

#[test]
fn test_reject_is_idempotent() {
    assert_eq!(
        PurchaseStatus::Pending.transition(PurchaseAction::Reject),
        TransitionOutcome::Applied
    );
    assert_eq!(
        PurchaseStatus::Rejected.transition(PurchaseAction::Reject),
        TransitionOutcome::AlreadyApplied
    );
}

#[test]
fn test_terminal_states_cannot_cross() {
    assert_eq!(
        PurchaseStatus::Confirmed.transition(PurchaseAction::Reject),
        TransitionOutcome::Invalid
    );
    assert_eq!(
        PurchaseStatus::Rejected.transition(PurchaseAction::Confirm),
        TransitionOutcome::Invalid
    );
}

// ============================================================================
// Draw Tests
// ============================================================================

#[test]
fn test_draw_requires_sold_tickets() {
    let mut rng = rand::thread_rng();
    assert_eq!(pick_winner(&[], &mut rng), None);
}

#[test]
fn test_winner_is_always_a_sold_number() {
    let sold = vec![1, 2, 5, 9];
    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let winner = pick_winner(&sold, &mut rng).unwrap();
        assert!(sold.contains(&winner));
    }
}

#[test]
fn test_single_ticket_draw_is_deterministic() {
    let mut rng = rand::thread_rng();
    assert_eq!(pick_winner(&[42], &mut rng), Some(42));
}

// ============================================================================
// Amount Determinism and Handoff Payload Tests
// ============================================================================

#[test]
fn test_total_amount_recomputed_from_count_and_price() {
    let price_per_number_cents = 1_000i64;
    let numbers = vec![3, 4, 9];

    let total = numbers.len() as i64 * price_per_number_cents;
    assert_eq!(total, 3_000);
}

#[test]
fn test_confirmation_payload_is_stable_and_ordered() {
    let message = ConfirmationMessage {
        lottery_title: "Gran Sorteo de Fin de Semana".to_string(),
        numbers: vec![44, 12, 89],
        total_cents: 3_000,
        purchase_id: "b74a4f9e".to_string(),
    };

    let rendered = message.render();
    assert!(rendered.contains("Gran Sorteo de Fin de Semana"));
    assert!(rendered.contains("44, 12, 89"));
    assert!(rendered.contains("$30"));
    assert!(rendered.contains("b74a4f9e"));

    // Deterministic: rendering twice yields byte-identical output.
    assert_eq!(rendered, message.render());

    let url = message.whatsapp_url("584121234567");
    assert!(url.starts_with("https://wa.me/584121234567?text="));
    assert!(url.is_ascii());
    assert!(!url.contains(' '));
}
