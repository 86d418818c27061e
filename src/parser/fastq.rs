//! FASTQ reader over a fully decoded payload. Every record is exactly four
//! lines: `@` header, sequence, `+` separator and quality.

use crate::errors::{ErrorPosition, ParseError};
use crate::parser::record::SequenceRecord;
use crate::parser::utils::{FastxReader, Format, Lines, Position};
use crate::quality::PHRED33_RANGE;

/// Parser for FASTQ text.
/// Only use this directly if you already have decoded text; otherwise go
/// through [`read_payload`](super::read_payload).
pub struct Reader<'a> {
    lines: Lines<'a>,
    position: Position,
    finished: bool,
}

impl<'a> Reader<'a> {
    /// Creates a new reader over `text`
    ///
    /// # Example:
    ///
    /// ```
    /// use readprep::parser::{FastqReader, FastxReader};
    ///
    /// let mut reader = FastqReader::new("@id\nACGT\n+\nIIII");
    /// let record = reader.next().unwrap().unwrap();
    /// assert_eq!(record.id(), "id");
    /// assert_eq!(record.qual(), Some(&b"IIII"[..]));
    /// ```
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: Lines::new(text),
            position: Position::new(1, 0),
            finished: false,
        }
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<SequenceRecord<'a>, ParseError>> {
        self.finished = true;
        Some(Err(err))
    }

    fn error_pos(&self, id: Option<&str>) -> ErrorPosition {
        ErrorPosition {
            line: self.lines.line_number(),
            id: id.map(|s| s.split(' ').next().unwrap_or(s).to_string()),
        }
    }

    /// Blank lines are only allowed once all the records have been read
    fn rest_is_blank(&mut self) -> Result<(), ParseError> {
        while let Some(line) = self.lines.next() {
            if !line.trim().is_empty() {
                return Err(ParseError::new_invalid_start(
                    line.as_bytes()[0],
                    self.error_pos(None),
                    Format::Fastq,
                ));
            }
        }
        Ok(())
    }
}

impl<'a> FastxReader<'a> for Reader<'a> {
    fn next(&mut self) -> Option<Result<SequenceRecord<'a>, ParseError>> {
        if self.finished {
            return None;
        }
        let record_position = self.lines.next_position();
        let header = match self.lines.peek() {
            None => {
                self.finished = true;
                return None;
            }
            Some(line) if line.trim().is_empty() => {
                self.finished = true;
                return self.rest_is_blank().err().map(Err);
            }
            Some(line) => line,
        };
        self.lines.next();
        self.position = record_position.clone();

        if !header.starts_with('@') {
            let err = ParseError::new_invalid_start(
                header.as_bytes()[0],
                self.error_pos(None),
                Format::Fastq,
            );
            return self.fail(err);
        }
        let description = &header[1..];

        let seq = match self.lines.next() {
            Some(s) => s,
            None => {
                let err = ParseError::new_unexpected_end(self.error_pos(Some(description)), Format::Fastq);
                return self.fail(err);
            }
        };

        match self.lines.next() {
            Some(sep) if sep.starts_with('+') => {}
            Some(sep) => {
                let found = sep.as_bytes().first().copied().unwrap_or(b'\n');
                let err = ParseError::new_invalid_separator(found, self.error_pos(Some(description)));
                return self.fail(err);
            }
            None => {
                let err = ParseError::new_unexpected_end(self.error_pos(Some(description)), Format::Fastq);
                return self.fail(err);
            }
        }

        let qual = match self.lines.next() {
            Some(q) => q,
            // an empty read may end the payload right after its separator
            None if seq.is_empty() => "",
            None => {
                let err = ParseError::new_unexpected_end(self.error_pos(Some(description)), Format::Fastq);
                return self.fail(err);
            }
        };

        if seq.len() != qual.len() {
            let err = ParseError::new_unequal_length(
                seq.len(),
                qual.len(),
                self.error_pos(Some(description)),
            );
            return self.fail(err);
        }
        if let Some(&q) = qual.as_bytes().iter().find(|q| !PHRED33_RANGE.contains(*q)) {
            let err = ParseError::new_invalid_quality(q, self.error_pos(Some(description)));
            return self.fail(err);
        }

        Some(Ok(SequenceRecord::new_fastq(
            description,
            seq.as_bytes(),
            qual.as_bytes(),
            record_position,
        )))
    }

    fn position(&self) -> &Position {
        &self.position
    }
}
