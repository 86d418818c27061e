use std::borrow::Cow;
use std::io::{self, Write};

use crate::parser::utils::{Format, LineEnding, Position};

/// A FASTA or FASTQ record, borrowing from the decoded payload text
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord<'a> {
    id: &'a str,
    description: &'a str,
    seq: Cow<'a, [u8]>,
    qual: Option<&'a [u8]>,
    position: Position,
    format: Format,
}

impl<'a> SequenceRecord<'a> {
    pub(crate) fn new_fasta(description: &'a str, seq: Cow<'a, [u8]>, position: Position) -> Self {
        Self {
            id: first_word(description),
            description,
            seq,
            qual: None,
            position,
            format: Format::Fasta,
        }
    }

    pub(crate) fn new_fastq(
        description: &'a str,
        seq: &'a [u8],
        qual: &'a [u8],
        position: Position,
    ) -> Self {
        Self {
            id: first_word(description),
            description,
            seq: seq.into(),
            qual: Some(qual),
            position,
            format: Format::Fastq,
        }
    }

    /// Returns the format of the record
    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the id of the record: the header up to the first whitespace
    #[inline]
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Returns the full header line, without its leading marker
    #[inline]
    pub fn description(&self) -> &'a str {
        self.description
    }

    /// Returns the sequence with any line breaks of a wrapped FASTA removed
    #[inline]
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    /// Returns the quality line if there is one.
    /// Always `None` for FASTA and `Some` for FASTQ, even if the quality line is empty.
    #[inline]
    pub fn qual(&self) -> Option<&'a [u8]> {
        self.qual
    }

    /// Return the number of bases in the sequence
    #[inline]
    pub fn num_bases(&self) -> usize {
        self.seq.len()
    }

    /// Return the line number in the payload of the start of the record
    pub fn start_line_number(&self) -> u64 {
        self.position.line
    }

    /// Return the line/byte position of the start of the record
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Write the record back as a FASTA entry. Quality is never written.
    pub fn write_fasta(&self, writer: &mut dyn Write, line_ending: LineEnding) -> io::Result<()> {
        write_fasta(self.id.as_bytes(), &self.seq, writer, line_ending)
    }
}

fn first_word(header: &str) -> &str {
    header.split_whitespace().next().unwrap_or("")
}

/// Write a FASTA record, terminated by `line_ending`
pub fn write_fasta(
    id: &[u8],
    seq: &[u8],
    writer: &mut dyn Write,
    line_ending: LineEnding,
) -> io::Result<()> {
    let ending = line_ending.to_bytes();
    writer.write_all(b">")?;
    writer.write_all(id)?;
    writer.write_all(&ending)?;
    writer.write_all(seq)?;
    writer.write_all(&ending)?;
    Ok(())
}
