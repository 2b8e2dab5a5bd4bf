//! Sold-number ledger algebra
//!
//! The pure set operations behind the reservation protocol. The services
//! run these inside row-locked transactions; keeping them here makes the
//! consistency rules testable without a database.
//!
//! Invariant maintained across reserve/release: the sold set is sorted,
//! duplicate-free, and equals the union of the numbers of all
//! non-rejected purchases of the raffle.

use rand::Rng;
use thiserror::Error;

/// Why a reservation request cannot be applied
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No numbers selected")]
    EmptySelection,

    #[error("Numbers out of range: {0:?}")]
    OutOfRange(Vec<i32>),

    #[error("Duplicate numbers in selection: {0:?}")]
    DuplicateSelection(Vec<i32>),

    #[error("Numbers already sold: {0:?}")]
    Unavailable(Vec<i32>),
}

/// Attempt to reserve `requested` against the current sold set.
///
/// All-or-nothing: any overlap with the sold set fails the whole request
/// and names exactly the conflicting numbers. On success returns the new
/// sold set, sorted.
pub fn reserve(
    sold: &[i32],
    requested: &[i32],
    total_numbers: i32,
) -> Result<Vec<i32>, LedgerError> {
    if requested.is_empty() {
        return Err(LedgerError::EmptySelection);
    }

    let out_of_range: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|n| !(1..=total_numbers).contains(n))
        .collect();
    if !out_of_range.is_empty() {
        return Err(LedgerError::OutOfRange(out_of_range));
    }

    let mut duplicates = Vec::new();
    for (i, &n) in requested.iter().enumerate() {
        if requested[..i].contains(&n) && !duplicates.contains(&n) {
            duplicates.push(n);
        }
    }
    if !duplicates.is_empty() {
        return Err(LedgerError::DuplicateSelection(duplicates));
    }

    let conflicts: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|n| sold.contains(n))
        .collect();
    if !conflicts.is_empty() {
        return Err(LedgerError::Unavailable(conflicts));
    }

    let mut updated: Vec<i32> = sold.to_vec();
    updated.extend_from_slice(requested);
    updated.sort_unstable();
    updated.dedup();
    Ok(updated)
}

/// Release a rejected purchase's numbers: exact set difference, never by
/// range or count. Numbers not present are ignored.
pub fn release(sold: &[i32], numbers: &[i32]) -> Vec<i32> {
    sold.iter()
        .copied()
        .filter(|n| !numbers.contains(n))
        .collect()
}

/// Pick the winning number uniformly at random from the sold set.
/// Returns None when nothing has been sold.
pub fn pick_winner<R: Rng + ?Sized>(sold: &[i32], rng: &mut R) -> Option<i32> {
    if sold.is_empty() {
        return None;
    }
    Some(sold[rng.gen_range(0..sold.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_reserve_success_sorted_union() {
        let updated = reserve(&[1, 5, 12], &[9, 3], 100).unwrap();
        assert_eq!(updated, vec![1, 3, 5, 9, 12]);
    }

    #[test]
    fn test_reserve_conflict_names_exact_numbers() {
        let err = reserve(&[3, 4], &[4, 5, 3], 10).unwrap_err();
        assert_eq!(err, LedgerError::Unavailable(vec![4, 3]));
    }

    #[test]
    fn test_reserve_empty_selection() {
        assert_eq!(reserve(&[1], &[], 10), Err(LedgerError::EmptySelection));
    }

    #[test]
    fn test_reserve_out_of_range() {
        let err = reserve(&[], &[0, 5, 11], 10).unwrap_err();
        assert_eq!(err, LedgerError::OutOfRange(vec![0, 11]));
    }

    #[test]
    fn test_reserve_duplicate_selection() {
        let err = reserve(&[], &[2, 3, 2, 3], 10).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateSelection(vec![2, 3]));
    }

    #[test]
    fn test_release_exact_difference() {
        let sold = vec![1, 3, 4, 7, 9];
        assert_eq!(release(&sold, &[3, 4]), vec![1, 7, 9]);
        // Releasing numbers that are not sold is harmless.
        assert_eq!(release(&sold, &[100]), sold);
    }

    #[test]
    fn test_pick_winner_membership() {
        let sold = vec![1, 2, 5, 9];
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let winner = pick_winner(&sold, &mut rng).unwrap();
            assert!(sold.contains(&winner));
        }
    }

    #[test]
    fn test_pick_winner_empty() {
        let mut rng = StepRng::new(0, 1);
        assert_eq!(pick_winner(&[], &mut rng), None);
    }
}
