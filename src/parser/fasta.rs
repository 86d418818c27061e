//! FASTA reader over a fully decoded payload. Wrapped sequence lines are
//! joined; the record ends where the next line starting with `>` begins.

use std::borrow::Cow;

use memchr::{memchr, memchr_iter};

use crate::errors::{ErrorPosition, ParseError};
use crate::parser::record::SequenceRecord;
use crate::parser::utils::{trim_cr, FastxReader, Format, Position};

/// Parser for FASTA text.
/// Only use this directly if you already have decoded text; otherwise go
/// through [`read_payload`](super::read_payload).
pub struct Reader<'a> {
    text: &'a str,
    pos: usize,
    position: Position,
    finished: bool,
}

impl<'a> Reader<'a> {
    /// Creates a new reader over `text`
    ///
    /// # Example:
    ///
    /// ```
    /// use readprep::parser::{FastaReader, FastxReader};
    ///
    /// let mut reader = FastaReader::new(">id\nACGT\nTT\n");
    /// let record = reader.next().unwrap().unwrap();
    /// assert_eq!(record.id(), "id");
    /// assert_eq!(record.seq(), b"ACGTTT");
    /// ```
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            position: Position::new(1, 0),
            finished: false,
        }
    }

    /// Moves past any lines made only of whitespace
    fn skip_blank_lines(&mut self) {
        let buf = self.text.as_bytes();
        while self.pos < buf.len() {
            let rest = &buf[self.pos..];
            let end = memchr(b'\n', rest);
            let line = &rest[..end.unwrap_or(rest.len())];
            if !line.iter().all(|b| b.is_ascii_whitespace()) {
                break;
            }
            match end {
                Some(e) => {
                    self.pos += e + 1;
                    self.position.line += 1;
                }
                None => self.pos = buf.len(),
            }
        }
        self.position.byte = self.pos as u64;
    }

    fn error_pos(&self) -> ErrorPosition {
        ErrorPosition {
            line: self.position.line,
            id: None,
        }
    }
}

/// Index of the newline that ends the sequence block, i.e. the one directly
/// followed by `>`
#[inline]
fn find_record_end(buf: &[u8]) -> Option<usize> {
    memchr_iter(b'\n', buf).find(|&i| buf.get(i + 1) == Some(&b'>'))
}

/// Join sequence lines, dropping line breaks and any other whitespace
fn strip_whitespace(block: &[u8]) -> Cow<[u8]> {
    if !block.iter().any(|b| b.is_ascii_whitespace()) {
        return block.into();
    }
    block
        .iter()
        .filter(|b| !b.is_ascii_whitespace())
        .copied()
        .collect::<Vec<u8>>()
        .into()
}

impl<'a> FastxReader<'a> for Reader<'a> {
    fn next(&mut self) -> Option<Result<SequenceRecord<'a>, ParseError>> {
        if self.finished {
            return None;
        }
        self.skip_blank_lines();
        let text = self.text;
        let buf = text.as_bytes();
        if self.pos >= buf.len() {
            self.finished = true;
            return None;
        }

        let start = self.pos;
        if buf[start] != b'>' {
            self.finished = true;
            return Some(Err(ParseError::new_invalid_start(
                buf[start],
                self.error_pos(),
                Format::Fasta,
            )));
        }

        let rest = &buf[start..];
        let header_end = memchr(b'\n', rest).map_or(buf.len(), |i| start + i);
        let header = trim_cr(&text[start + 1..header_end]);

        let seq_start = (header_end + 1).min(buf.len());
        let block_end = find_record_end(&buf[header_end..]).map_or(buf.len(), |i| header_end + i);
        let seq = strip_whitespace(&buf[seq_start..block_end.max(seq_start)]);

        let record_position = self.position.clone();
        let consumed = (block_end + 1).min(buf.len());
        self.position.line += bytecount::count(&buf[start..consumed], b'\n') as u64;
        self.pos = consumed;
        self.position.byte = consumed as u64;

        Some(Ok(SequenceRecord::new_fasta(header, seq, record_position)))
    }

    fn position(&self) -> &Position {
        &self.position
    }
}
