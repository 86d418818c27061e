//! Phred+33 quality scores and per-read error estimates.

use std::ops::RangeInclusive;

/// Printable characters a Phred+33 quality line may contain
pub const PHRED33_RANGE: RangeInclusive<u8> = b'!'..=b'~';

// Phred score 0
const PHRED33_OFFSET: u8 = b'!';

/// Probability that a base call with Phred score `q` is wrong: `10^(-q/10)`
#[inline]
pub fn error_probability(q: u8) -> f64 {
    10f64.powf(-f64::from(q) / 10.0)
}

/// Mean per-base error probability of a Phred+33 quality line.
///
/// An empty line has no error (`0.0`). Characters below the offset are
/// counted as Phred 0; the parser rejects those before they get here.
///
/// ```
/// use readprep::quality::average_error;
///
/// // 'I' is Phred 40, a 1 in 10,000 chance of a wrong call
/// assert!((average_error(b"IIII") - 0.0001).abs() < 1e-12);
/// assert_eq!(average_error(b""), 0.0);
/// ```
pub fn average_error(qual: &[u8]) -> f64 {
    if qual.is_empty() {
        return 0.0;
    }
    let total: f64 = qual
        .iter()
        .map(|q| error_probability(q.saturating_sub(PHRED33_OFFSET)))
        .sum();
    total / qual.len() as f64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_probability() {
        assert_eq!(error_probability(0), 1.0);
        assert!((error_probability(10) - 0.1).abs() < 1e-12);
        assert!((error_probability(20) - 0.01).abs() < 1e-12);
        assert!((error_probability(30) - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_average_error_high_quality() {
        let avg = average_error(b"IIIIIIIIII");
        assert!(avg < 0.001);
        assert!((avg - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn test_average_error_is_mean_of_probabilities() {
        // Phred 0 and Phred 10: (1.0 + 0.1) / 2
        let avg = average_error(b"!+");
        assert!((avg - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_average_error_empty() {
        assert_eq!(average_error(b""), 0.0);
    }
}
