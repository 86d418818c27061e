//! Length and quality acceptance of trimmed reads.

use serde_derive::{Deserialize, Serialize};

use crate::config::ProcessingConfig;
use crate::parser::SequenceRecord;
use crate::quality::average_error;
use crate::trim::trim;

/// A read that survived trimming and filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub id: String,
    pub sequence: String,
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Mean per-base error probability, rounded to 6 decimals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_error: Option<f64>,
}

/// Why a read was dropped
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Rejection {
    TooShort(usize),
    TooLong(usize),
    TooManyErrors(f64),
}

/// Round to 6 decimals, halves away from zero. The tie is decided on the
/// scaled value, so `0.1234565`, stored just below the tie, still scales to
/// exactly `123456.5` and comes out as `0.123457`.
#[inline]
fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Check an already trimmed read against the configured bounds.
///
/// Both length bounds are inclusive and a mean error equal to `max_error`
/// passes. Reads without quality are never rejected on quality.
pub fn filter_trimmed(
    id: &str,
    seq: &[u8],
    qual: Option<&[u8]>,
    config: &ProcessingConfig,
) -> Result<ProcessedRecord, Rejection> {
    let length = seq.len();
    if length < config.min_length() {
        return Err(Rejection::TooShort(length));
    }
    if length > config.max_length() {
        return Err(Rejection::TooLong(length));
    }

    let avg_error = match qual {
        Some(q) => {
            let avg = average_error(q);
            if avg > config.max_error() {
                return Err(Rejection::TooManyErrors(avg));
            }
            Some(round6(avg))
        }
        None => None,
    };

    Ok(ProcessedRecord {
        id: id.to_string(),
        sequence: String::from_utf8_lossy(seq).into_owned(),
        length,
        quality: qual.map(|q| String::from_utf8_lossy(q).into_owned()),
        avg_error,
    })
}

/// Trim one parsed read and decide whether to keep it
pub fn process_record(
    record: &SequenceRecord,
    config: &ProcessingConfig,
) -> Result<ProcessedRecord, Rejection> {
    let (seq, qual) = trim(
        record.seq(),
        record.qual(),
        config.const5p().as_bytes(),
        config.const3p().as_bytes(),
        config.adapter_tolerance(),
    );
    filter_trimmed(record.id(), seq, qual, config)
}
