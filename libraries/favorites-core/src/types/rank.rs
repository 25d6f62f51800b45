//! Rank helpers

/// 1-based position of a favorite in the collection
pub type Rank = i64;

/// Highest rank a favorite may hold
///
/// Keeps every rank shift well inside `i64` and inside SQLite's integer range.
pub const MAX_RANK: Rank = i32::MAX as Rank;

/// Whether `rank` is in `1..=MAX_RANK`
pub fn is_valid_rank(rank: Rank) -> bool {
    (1..=MAX_RANK).contains(&rank)
}

/// Check that `ranks` is exactly `1..=N` for `N = ranks.len()`
///
/// Order of the input does not matter. An empty slice is contiguous.
pub fn is_contiguous(ranks: &[Rank]) -> bool {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(index, rank)| *rank == index as Rank + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_contiguous() {
        assert!(is_contiguous(&[]));
    }

    #[test]
    fn unordered_permutation_is_contiguous() {
        assert!(is_contiguous(&[3, 1, 4, 2]));
    }

    #[test]
    fn valid_rank_bounds() {
        assert!(is_valid_rank(1));
        assert!(is_valid_rank(MAX_RANK));
        assert!(!is_valid_rank(0));
        assert!(!is_valid_rank(MAX_RANK + 1));
        assert!(!is_valid_rank(Rank::MAX));
    }

    #[test]
    fn gaps_and_duplicates_are_rejected() {
        assert!(!is_contiguous(&[1, 2, 4]));
        assert!(!is_contiguous(&[1, 2, 2]));
        assert!(!is_contiguous(&[0, 1, 2]));
        assert!(!is_contiguous(&[2, 3]));
    }
}
