//! The end-to-end preprocessing run: payload in, accepted reads out, and
//! the FASTA export of those reads.
use std::io::{self, Write};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::ProcessingConfig;
use crate::errors::{Error, Result};
use crate::filter::{process_record, ProcessedRecord, Rejection};
use crate::parser::{
    parse_records, read_payload, write_fasta, Format, LineEnding, PayloadKind, SequenceRecord,
};

fn accept(record: &SequenceRecord, config: &ProcessingConfig) -> Option<ProcessedRecord> {
    match process_record(record, config) {
        Ok(processed) => Some(processed),
        Err(reason) => {
            log_rejection(record.id(), reason);
            None
        }
    }
}

fn log_rejection(id: &str, reason: Rejection) {
    match reason {
        Rejection::TooShort(len) => trace!(id, len, "read too short after trimming"),
        Rejection::TooLong(len) => trace!(id, len, "read too long after trimming"),
        Rejection::TooManyErrors(avg_error) => trace!(id, avg_error, "read quality too low"),
    }
}

/// Trim and filter every read of already decoded `text`, in file order.
///
/// A single malformed record fails the whole call.
pub fn preprocess_text(
    text: &str,
    format: Format,
    config: &ProcessingConfig,
) -> Result<Vec<ProcessedRecord>> {
    let records = parse_records(text, format)?;
    let accepted: Vec<ProcessedRecord> = records
        .iter()
        .filter_map(|record| accept(record, config))
        .collect();

    debug!(
        parsed = records.len(),
        accepted = accepted.len(),
        "preprocessing done"
    );
    Ok(accepted)
}

/// Same as [`preprocess_text`], with the per-read work spread over the rayon
/// thread pool. Output order is still file order.
#[cfg(feature = "parallel")]
pub fn preprocess_text_parallel(
    text: &str,
    format: Format,
    config: &ProcessingConfig,
) -> Result<Vec<ProcessedRecord>> {
    let records = parse_records(text, format)?;
    let accepted: Vec<ProcessedRecord> = records
        .par_iter()
        .filter_map(|record| accept(record, config))
        .collect();

    debug!(
        parsed = records.len(),
        accepted = accepted.len(),
        threads = rayon::current_num_threads(),
        "preprocessing done"
    );
    Ok(accepted)
}

fn decode(raw: &[u8], filename: &str) -> Result<(PayloadKind, String)> {
    let (kind, text) = read_payload(raw, filename)?;
    debug!(
        filename,
        format = ?kind.format,
        compression = ?kind.compression,
        bytes = text.len(),
        "decoded payload"
    );
    Ok((kind, text))
}

/// Detect, decode and parse `raw`, then trim and filter every read.
///
/// Accepted reads come back in file order; rejected reads are dropped
/// silently. Any error (unknown suffix, empty or undecodable payload, a
/// single malformed record) fails the whole call.
///
/// ```
/// use readprep::{preprocess, ProcessingConfig};
///
/// let config = ProcessingConfig::new(3, 20, 0.01).unwrap().with_const5p("ATCG");
/// let reads = preprocess(b"@r1\nATCGNNNNNN\n+\nIIIIIIIIII\n", "run.fastq", &config).unwrap();
/// assert_eq!(reads[0].sequence, "NNNNNN");
/// ```
pub fn preprocess(
    raw: &[u8],
    filename: &str,
    config: &ProcessingConfig,
) -> Result<Vec<ProcessedRecord>> {
    let (kind, text) = decode(raw, filename)?;
    preprocess_text(&text, kind.format, config)
}

/// Same as [`preprocess`], with the per-read work spread over the rayon
/// thread pool. Output order is still file order.
#[cfg(feature = "parallel")]
pub fn preprocess_parallel(
    raw: &[u8],
    filename: &str,
    config: &ProcessingConfig,
) -> Result<Vec<ProcessedRecord>> {
    let (kind, text) = decode(raw, filename)?;
    preprocess_text_parallel(&text, kind.format, config)
}

/// Render reads as two-line FASTA records joined by `\n`, without a
/// trailing newline.
///
/// ```
/// use readprep::{export_fasta, ProcessedRecord};
///
/// let rec = ProcessedRecord {
///     id: "seq1".to_string(),
///     sequence: "ACGT".to_string(),
///     length: 4,
///     quality: None,
///     avg_error: None,
/// };
/// assert_eq!(export_fasta(&[rec]).unwrap(), ">seq1\nACGT");
/// ```
pub fn export_fasta(records: &[ProcessedRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(Error::EmptyInput("No sequences provided".to_string()));
    }
    let lines: Vec<String> = records
        .iter()
        .map(|r| format!(">{}\n{}", r.id, r.sequence))
        .collect();
    Ok(lines.join("\n"))
}

/// Stream reads to `writer` as FASTA, every line terminated by
/// `line_ending`. Writes nothing for an empty slice.
pub fn write_fasta_records(
    records: &[ProcessedRecord],
    writer: &mut dyn Write,
    line_ending: LineEnding,
) -> io::Result<()> {
    for record in records {
        write_fasta(
            record.id.as_bytes(),
            record.sequence.as_bytes(),
            writer,
            line_ending,
        )?;
    }
    Ok(())
}
