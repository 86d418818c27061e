//! Handles everything between raw payload bytes and parsed records:
//! format/compression detection from the filename, decompression, text
//! decoding and FASTA/FASTQ parsing.
#[cfg(feature = "compression")]
use std::io::Read;

#[cfg(feature = "compression")]
use bzip2::read::BzDecoder;
#[cfg(feature = "compression")]
use flate2::read::MultiGzDecoder;
#[cfg(feature = "compression")]
use xz2::read::XzDecoder;

use crate::errors::{Error, Result};
pub use crate::parser::fasta::Reader as FastaReader;
pub use crate::parser::fastq::Reader as FastqReader;

mod record;
mod utils;

mod fasta;
mod fastq;

pub use crate::parser::utils::FastxReader;

// Checked against the lowercased filename, FASTQ first since ".fa" is a
// prefix of ".fastq"
const FASTQ_MARKERS: [&str; 2] = [".fastq", ".fq"];
const FASTA_MARKERS: [&str; 2] = [".fasta", ".fa"];

// Suffix of the lowercased filename for each compression format
const GZ_SUFFIX: &str = ".gz";
const BZ_SUFFIX: &str = ".bz2";
const XZ_SUFFIX: &str = ".xz";

/// What the filename says about a payload
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PayloadKind {
    pub compression: Compression,
    pub format: Format,
}

impl PayloadKind {
    pub fn is_compressed(&self) -> bool {
        self.compression.is_compressed()
    }
}

/// Decide compression and record format from the filename alone; the
/// content is never sniffed.
///
/// ```
/// use readprep::parser::{detect_format, Compression, Format};
///
/// let kind = detect_format("reads.FQ.gz").unwrap();
/// assert_eq!(kind.format, Format::Fastq);
/// assert_eq!(kind.compression, Compression::Gzip);
/// assert!(detect_format("reads.txt").is_err());
/// ```
pub fn detect_format(filename: &str) -> Result<PayloadKind> {
    let name = filename.to_lowercase();

    let compression = if name.ends_with(GZ_SUFFIX) {
        Compression::Gzip
    } else if name.ends_with(BZ_SUFFIX) {
        Compression::Bzip2
    } else if name.ends_with(XZ_SUFFIX) {
        Compression::Xz
    } else {
        Compression::None
    };

    let format = if FASTQ_MARKERS.iter().any(|m| name.contains(m)) {
        Format::Fastq
    } else if FASTA_MARKERS.iter().any(|m| name.contains(m)) {
        Format::Fasta
    } else {
        return Err(Error::UnsupportedFormat(filename.to_string()));
    };

    Ok(PayloadKind {
        compression,
        format,
    })
}

#[cfg(feature = "compression")]
fn decompress(raw: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let read = match compression {
        Compression::None => {
            out.extend_from_slice(raw);
            Ok(raw.len())
        }
        Compression::Gzip => MultiGzDecoder::new(raw).read_to_end(&mut out),
        Compression::Bzip2 => BzDecoder::new(raw).read_to_end(&mut out),
        Compression::Xz => XzDecoder::new(raw).read_to_end(&mut out),
    };
    read.map_err(|e| Error::Decode(e.to_string()))?;
    Ok(out)
}

#[cfg(not(feature = "compression"))]
fn decompress(raw: &[u8], compression: Compression) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(raw.to_vec()),
        _ => Err(Error::Decode(format!(
            "{:?} payload but compression support not enabled",
            compression
        ))),
    }
}

/// Decompress `raw` if needed and decode it as UTF-8 text
pub fn decode_payload(raw: &[u8], compression: Compression) -> Result<String> {
    if raw.is_empty() {
        return Err(Error::EmptyInput("File content is empty".to_string()));
    }
    let bytes = decompress(raw, compression)?;
    let text = String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))?;
    if text.is_empty() {
        return Err(Error::EmptyInput(
            "Payload is empty after decompression".to_string(),
        ));
    }
    Ok(text)
}

/// Parse already decoded text with the reader for `format`
pub fn parse_fastx_str<'a>(text: &'a str, format: Format) -> Box<dyn FastxReader<'a> + 'a> {
    match format {
        Format::Fasta => Box::new(FastaReader::new(text)),
        Format::Fastq => Box::new(FastqReader::new(text)),
    }
}

/// Parse every record of `text`, in file order. The first malformed record
/// fails the whole call.
pub fn parse_records(text: &str, format: Format) -> Result<Vec<SequenceRecord<'_>>> {
    let mut reader = parse_fastx_str(text, format);
    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        records.push(record?);
    }
    Ok(records)
}

/// Detect, decompress and decode a payload: the text the records of
/// [`parse_records`] borrow from.
pub fn read_payload(raw: &[u8], filename: &str) -> Result<(PayloadKind, String)> {
    let kind = detect_format(filename)?;
    let text = decode_payload(raw, kind.compression)?;
    Ok((kind, text))
}

pub use record::{write_fasta, SequenceRecord};
pub use utils::{find_line_ending, Compression, Format, LineEnding, Position};
