//! Removal of the constant regions flanking a read.
//!
//! The 5' adapter is searched in the whole read and everything up to the end
//! of its match is dropped. The 3' adapter is then searched in what remains
//! and everything from the start of its match is dropped. Quality strings are
//! cut at the same positions. A missing match leaves that side untouched.

use std::ops::Range;

use crate::matcher::find;

/// Error rate allowed when locating an adapter, as a fraction of its length
pub const DEFAULT_ADAPTER_TOLERANCE: f64 = 0.1;

/// The part of a read of length `seq.len()` that survives adapter removal
pub fn adapter_span(seq: &[u8], const5p: &[u8], const3p: &[u8], tolerance: f64) -> Range<usize> {
    let mut start = 0;
    let mut end = seq.len();

    if let Some((_, match_end)) = find(const5p, seq, tolerance) {
        start = match_end;
    }
    if let Some((match_start, _)) = find(const3p, &seq[start..], tolerance) {
        end = start + match_start;
    }

    start..end
}

/// Trim both adapters off `seq`, cutting `qual` in lockstep when present.
///
/// Trimming only ever removes a prefix and/or a suffix; with both adapters
/// empty the inputs are returned as-is.
///
/// ```
/// use readprep::trim::{trim, DEFAULT_ADAPTER_TOLERANCE};
///
/// let (seq, qual) = trim(b"ATCGNNNNNN", Some(b"IIIIIIIIII"), b"ATCG", b"", DEFAULT_ADAPTER_TOLERANCE);
/// assert_eq!(seq, b"NNNNNN");
/// assert_eq!(qual, Some(&b"IIIIII"[..]));
/// ```
pub fn trim<'s, 'q>(
    seq: &'s [u8],
    qual: Option<&'q [u8]>,
    const5p: &[u8],
    const3p: &[u8],
    tolerance: f64,
) -> (&'s [u8], Option<&'q [u8]>) {
    let span = adapter_span(seq, const5p, const3p, tolerance);
    // the parser guarantees equal lengths; clamp anyway so a short quality
    // line can't panic
    let qual = qual.map(|q| &q[span.start.min(q.len())..span.end.min(q.len())]);
    (&seq[span], qual)
}
