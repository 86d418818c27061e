//! The errors readprep can return: record-level parse errors carry a position,
//! everything else is one of the batch-level kinds in [`Error`].

use std::fmt;

use thiserror::Error;

use crate::parser::Format;

/// Represents where we were in a payload when a parse error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Line number where the error occurred (starting with 1)
    pub line: u64,
    /// ID of record if available
    pub id: Option<String>,
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(id) = self.id.as_ref() {
            write!(f, "record '{id}' at ")?;
        }
        write!(f, "line {}", self.line)
    }
}

/// What was structurally wrong with a FASTA/FASTQ record
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Invalid start byte of record encountered (expected `@` in FASTQ and `>` in FASTA)
    InvalidStart,
    /// The separator line in a FASTQ file is not valid (no `+`)
    InvalidSeparator,
    /// Sequence and quality lengths are not equal (in a FASTQ file only)
    UnequalLengths,
    /// Truncated record found
    UnexpectedEnd,
    /// A quality character is outside the printable Phred+33 range
    InvalidQuality,
}

/// A malformed record somewhere in the payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// A description of what went wrong
    pub msg: String,
    /// The type of error that occurred
    pub kind: ParseErrorKind,
    /// Position within the payload
    pub position: ErrorPosition,
    /// The format of the payload we were parsing
    pub format: Option<Format>,
}

impl ParseError {
    pub fn new_invalid_start(byte_found: u8, position: ErrorPosition, format: Format) -> Self {
        let msg = format!(
            "Expected '{}' but found '{}'",
            format.start_char(),
            (byte_found as char).escape_default()
        );
        Self {
            kind: ParseErrorKind::InvalidStart,
            msg,
            position,
            format: Some(format),
        }
    }

    pub fn new_invalid_separator(byte_found: u8, position: ErrorPosition) -> Self {
        let msg = format!(
            "Expected '+' separator but found '{}'",
            (byte_found as char).escape_default()
        );
        Self {
            kind: ParseErrorKind::InvalidSeparator,
            msg,
            position,
            format: Some(Format::Fastq),
        }
    }

    pub fn new_unequal_length(seq_len: usize, qual_len: usize, position: ErrorPosition) -> Self {
        let msg = format!(
            "Sequence length is {} but quality length is {}",
            seq_len, qual_len
        );
        Self {
            kind: ParseErrorKind::UnequalLengths,
            msg,
            position,
            format: Some(Format::Fastq),
        }
    }

    pub fn new_unexpected_end(position: ErrorPosition, format: Format) -> Self {
        Self {
            msg: String::new(),
            kind: ParseErrorKind::UnexpectedEnd,
            position,
            format: Some(format),
        }
    }

    pub fn new_invalid_quality(byte_found: u8, position: ErrorPosition) -> Self {
        let msg = format!(
            "Quality character '{}' is outside the Phred+33 range",
            (byte_found as char).escape_default()
        );
        Self {
            kind: ParseErrorKind::InvalidQuality,
            msg,
            position,
            format: Some(Format::Fastq),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ParseErrorKind::UnequalLengths
            | ParseErrorKind::InvalidStart
            | ParseErrorKind::InvalidSeparator
            | ParseErrorKind::InvalidQuality => write!(f, "{} ({})", self.msg, self.position),
            ParseErrorKind::UnexpectedEnd => {
                write!(f, "Unexpected end of input ({}).", self.position)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Fieldless mirror of [`Error`], handy for callers mapping errors to
/// user-facing responses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    EmptyInput,
    DecodeError,
    MalformedRecord,
    InvalidConfig,
    PayloadNotFound,
}

/// Every way a preprocessing call can fail. Any of these aborts the whole
/// batch; filtered-out records are not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The filename suffix is neither FASTA nor FASTQ
    #[error("Unsupported file format: '{0}'. Please provide FASTA or FASTQ file.")]
    UnsupportedFormat(String),

    /// Zero-length payload, or nothing to export
    #[error("{0}")]
    EmptyInput(String),

    /// Decompression or text decoding failed
    #[error("Could not decode payload: {0}")]
    Decode(String),

    /// A structurally invalid FASTA/FASTQ entry
    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] ParseError),

    /// Caller-supplied parameters violate the configuration constraints
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No stored payload under the given handle
    #[error("No payload stored under handle '{0}'")]
    PayloadNotFound(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::Decode(_) => ErrorKind::DecodeError,
            Error::MalformedRecord(_) => ErrorKind::MalformedRecord,
            Error::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Error::PayloadNotFound(_) => ErrorKind::PayloadNotFound,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = ErrorPosition {
            line: 5,
            id: Some("read1".to_string()),
        };
        assert_eq!(pos.to_string(), "record 'read1' at line 5");
        assert_eq!(ErrorPosition::default().to_string(), "line 0");
    }

    #[test]
    fn test_malformed_wraps_parse_error() {
        let e: Error = ParseError::new_unequal_length(4, 3, ErrorPosition::default()).into();
        assert_eq!(e.kind(), ErrorKind::MalformedRecord);
        assert_eq!(
            e.to_string(),
            "Malformed record: Sequence length is 4 but quality length is 3 (line 0)"
        );
    }
}
