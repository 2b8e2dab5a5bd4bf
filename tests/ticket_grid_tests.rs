//! Ticket Grid and Selection Tests
//!
//! Validates the storefront-side core: grid classification, selection
//! toggling, and the interplay between a stale local selection and a
//! refreshed sold set.

use pukatu_server::tickets::{NumberState, Selection, TicketGrid};

// ============================================================================
// Grid Classification Tests
// ============================================================================

#[test]
fn test_every_number_has_exactly_one_state() {
    let grid = TicketGrid::new(20, &[1, 5, 12]);
    let mut selection = Selection::new();
    selection.toggle(&grid, 3);
    selection.toggle(&grid, 17);

    let states = grid.states(&selection);
    assert_eq!(states.len(), 20);

    let sold = states
        .iter()
        .filter(|(_, s)| *s == NumberState::Sold)
        .count();
    let selected = states
        .iter()
        .filter(|(_, s)| *s == NumberState::Selected)
        .count();
    let available = states
        .iter()
        .filter(|(_, s)| *s == NumberState::Available)
        .count();

    assert_eq!(sold, 3);
    assert_eq!(selected, 2);
    assert_eq!(available, 15);
}

#[test]
fn test_sold_dominates_selection() {
    // Pick numbers while the grid is fresh.
    let fresh = TicketGrid::new(10, &[]);
    let mut selection = Selection::new();
    assert!(selection.toggle(&fresh, 4));
    assert!(selection.toggle(&fresh, 6));

    // Another buyer takes 4; the refreshed grid must never show it as
    // selected even though it is still in the local selection.
    let refreshed = TicketGrid::new(10, &[4]);
    assert!(selection.contains(4));
    assert_eq!(refreshed.classify(&selection, 4), NumberState::Sold);
    assert_eq!(refreshed.classify(&selection, 6), NumberState::Selected);
}

#[test]
fn test_sold_number_cannot_be_toggled() {
    let grid = TicketGrid::new(10, &[7]);
    let mut selection = Selection::new();

    assert!(!selection.toggle(&grid, 7));
    assert!(selection.is_empty());
}

// ============================================================================
// Selection Semantics Tests
// ============================================================================

#[test]
fn test_toggle_is_an_involution_on_open_numbers() {
    let grid = TicketGrid::new(10, &[]);
    let mut selection = Selection::new();

    selection.toggle(&grid, 5);
    assert!(selection.contains(5));
    selection.toggle(&grid, 5);
    assert!(!selection.contains(5));
}

#[test]
fn test_selection_preserves_pick_order_for_the_handoff() {
    let grid = TicketGrid::new(100, &[]);
    let mut selection = Selection::new();
    for n in [55, 3, 78, 21] {
        selection.toggle(&grid, n);
    }
    assert_eq!(selection.as_slice(), &[55, 3, 78, 21]);
}

#[test]
fn test_prune_after_conflict_drops_only_stale_numbers() {
    let grid = TicketGrid::new(10, &[]);
    let mut selection = Selection::new();
    for n in [2, 9, 4, 7] {
        selection.toggle(&grid, n);
    }

    // Server said 9 and 4 were taken; re-intersect and keep the rest.
    let refreshed = TicketGrid::new(10, &[9, 4]);
    selection.prune_sold(&refreshed);
    assert_eq!(selection.as_slice(), &[2, 7]);
}

#[test]
fn test_clear_after_successful_submit() {
    let grid = TicketGrid::new(10, &[]);
    let mut selection = Selection::new();
    selection.toggle(&grid, 1);
    selection.toggle(&grid, 2);

    selection.clear();
    assert!(selection.is_empty());
    assert_eq!(selection.total_cents(1_000), 0);
}

#[test]
fn test_total_follows_selection_size() {
    let grid = TicketGrid::new(10, &[]);
    let mut selection = Selection::new();

    selection.toggle(&grid, 1);
    assert_eq!(selection.total_cents(1_000), 1_000);
    selection.toggle(&grid, 2);
    selection.toggle(&grid, 3);
    assert_eq!(selection.total_cents(1_000), 3_000);
    selection.toggle(&grid, 2);
    assert_eq!(selection.total_cents(1_000), 2_000);
}
