use memchr::memchr;

use crate::errors::ParseError;
use crate::parser::record::SequenceRecord;

/// Remove a final '\r' from a line
#[inline]
pub(crate) fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Holds line number and byte offset of our current state in a parser
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub(crate) line: u64,
    pub(crate) byte: u64,
}

impl Position {
    pub fn new(line: u64, byte: u64) -> Self {
        Self { line, byte }
    }

    /// Line number (starting with 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Byte offset within the payload
    pub fn byte(&self) -> u64 {
        self.byte
    }
}

/// FASTA or FASTQ?
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Fasta,
    Fastq,
}

impl Format {
    pub fn start_char(&self) -> char {
        match self {
            Self::Fasta => '>',
            Self::Fastq => '@',
        }
    }
}

/// Compression codec inferred from the filename suffix
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
}

impl Compression {
    pub fn is_compressed(&self) -> bool {
        *self != Compression::None
    }
}

/// Whether it uses \r\n or only \n
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum LineEnding {
    Windows,
    Unix,
}

impl LineEnding {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Windows => vec![b'\r', b'\n'],
            Self::Unix => vec![b'\n'],
        }
    }
}

/// Line ending style of the first line of `bytes`, if it has one
pub fn find_line_ending(bytes: &[u8]) -> Option<LineEnding> {
    if !bytes.is_empty() {
        if let Some(idx) = memchr(b'\n', bytes) {
            if idx > 0 && bytes[idx - 1] == b'\r' {
                return Some(LineEnding::Windows);
            }

            return Some(LineEnding::Unix);
        }
    }
    None
}

/// The main trait, iterator-like, that the FASTA and FASTQ readers implement
pub trait FastxReader<'a> {
    /// Gets the next record in the payload.
    /// This returns None once we reached the end of the text.
    fn next(&mut self) -> Option<Result<SequenceRecord<'a>, ParseError>>;
    /// Returns the current line/byte in the payload we are reading from
    fn position(&self) -> &Position;
}

/// Splits text into lines without their terminators, keeping track of the
/// line number and byte offset of the line that was returned last.
#[derive(Debug, Clone)]
pub(crate) struct Lines<'a> {
    text: &'a str,
    pos: usize,
    line: u64,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
        }
    }

    /// Start of the next line, without consuming it
    pub(crate) fn peek(&self) -> Option<&'a str> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let end = memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
        Some(trim_cr(&rest[..end]))
    }

    /// Position (line, byte) at which the next line starts
    pub(crate) fn next_position(&self) -> Position {
        Position::new(self.line + 1, self.pos as u64)
    }

    pub(crate) fn line_number(&self) -> u64 {
        self.line
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let (line, consumed) = match memchr(b'\n', rest.as_bytes()) {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        self.line += 1;
        Some(trim_cr(line))
    }
}
