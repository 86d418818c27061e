//! Substitution-tolerant substring search used to locate adapters.
//!
//! Only mismatches are counted; insertions and deletions are not modeled.
//! The search returns the leftmost window whose mismatch count fits the
//! budget, not the window with the fewest mismatches.

/// Number of mismatches allowed for a pattern of `pattern_len` bases at a
/// given error rate, truncated towards zero.
#[inline]
pub fn max_mismatches(pattern_len: usize, max_distance: f64) -> usize {
    // `as` saturates, so a negative or NaN rate allows no mismatches
    (pattern_len as f64 * max_distance) as usize
}

/// Compare `pattern` against `window` case-insensitively, giving up as soon
/// as more than `limit` positions differ.
#[inline]
fn within_mismatches(pattern: &[u8], window: &[u8], limit: usize) -> bool {
    let mut mismatches = 0;
    for (p, w) in pattern.iter().zip(window.iter()) {
        if !p.eq_ignore_ascii_case(w) {
            mismatches += 1;
            if mismatches > limit {
                return false;
            }
        }
    }
    true
}

/// Find the leftmost occurrence of `pattern` in `seq` with at most
/// `floor(len(pattern) * max_distance)` mismatching bases.
///
/// Returns the half-open `(start, end)` span of the match. An empty pattern,
/// or one longer than the sequence, never matches.
///
/// ```
/// use readprep::matcher::find;
///
/// assert_eq!(find(b"ATCG", b"XXATCGXX", 0.1), Some((2, 6)));
/// assert_eq!(find(b"ATCG", b"XXATCAXX", 0.3), Some((2, 6)));
/// assert_eq!(find(b"ATCG", b"GGGGGGGG", 0.1), None);
/// ```
pub fn find(pattern: &[u8], seq: &[u8], max_distance: f64) -> Option<(usize, usize)> {
    if pattern.is_empty() || pattern.len() > seq.len() {
        return None;
    }
    let limit = max_mismatches(pattern.len(), max_distance);
    seq.windows(pattern.len())
        .position(|window| within_mismatches(pattern, window, limit))
        .map(|start| (start, start + pattern.len()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(find(b"ATCG", b"XXATCGXX", 0.1), Some((2, 6)));
        assert_eq!(find(b"ATCG", b"ATCG", 0.0), Some((0, 4)));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert_eq!(find(b"", b"ACGT", 0.0), None);
        assert_eq!(find(b"", b"ACGT", 1.0), None);
        assert_eq!(find(b"", b"", 0.5), None);
    }

    #[test]
    fn test_pattern_longer_than_sequence() {
        assert_eq!(find(b"ACGTA", b"ACGT", 1.0), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(find(b"atcg", b"GGATCGGG", 0.0), Some((2, 6)));
        assert_eq!(find(b"ATCG", b"ggatcggg", 0.0), Some((2, 6)));
    }

    #[test]
    fn test_mismatch_budget_is_truncated() {
        // 4 * 0.1 = 0.4 -> no mismatch allowed
        assert_eq!(find(b"ATCG", b"XXATCAXX", 0.1), None);
        // 4 * 0.3 = 1.2 -> one mismatch allowed
        assert_eq!(find(b"ATCG", b"XXATCAXX", 0.3), Some((2, 6)));
        // 10 * 0.1 = 1 -> one mismatch allowed
        assert_eq!(
            find(b"AAAAAAAAAA", b"CCAAAATAAAAACC", 0.1),
            Some((2, 12))
        );
        assert_eq!(max_mismatches(20, 0.1), 2);
        assert_eq!(max_mismatches(30, 0.1), 3);
        assert_eq!(max_mismatches(9, 0.1), 0);
    }

    #[test]
    fn test_leftmost_not_best() {
        // first window has one mismatch, a later one is exact
        let seq = b"ACGTTAAAAAAAAAAACGTAAAAAAAAAA";
        assert_eq!(find(b"ACGTA", seq, 0.2), Some((0, 5)));
        assert_eq!(find(b"ACGTA", seq, 0.0), Some((15, 20)));
    }

    #[test]
    fn test_exact_occurrence_property() {
        let seq = b"TTGACCATGCATGCAAA";
        for (i, window) in seq.windows(4).enumerate() {
            let (start, end) = find(window, seq, 0.0).unwrap();
            assert!(start <= i);
            assert_eq!(end - start, 4);
            assert_eq!(&seq[start..end], window);
        }
    }

    #[test]
    fn test_negative_rate_allows_no_mismatch() {
        assert_eq!(max_mismatches(10, -0.5), 0);
        assert_eq!(find(b"ACGT", b"ACGA", -1.0), None);
    }
}
