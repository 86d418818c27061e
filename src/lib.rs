#![crate_name = "readprep"]
//! Preprocessing of sequencing reads: parse a FASTA/FASTQ payload (optionally
//! compressed), trim the constant adapter regions off every read, drop reads
//! that are too short, too long or too error-prone, and export the survivors
//! as FASTA.
//!
//! ```
//! use readprep::{export_fasta, preprocess, ProcessingConfig};
//!
//! let config = ProcessingConfig::new(10, 20, 0.005).unwrap();
//! let payload = b">seq1\nATCGATCGATCGATCG\n>seq2\nGGGGGGGGGGGG\n";
//! let reads = preprocess(payload, "reads.fasta", &config).unwrap();
//! assert_eq!(reads.len(), 2);
//! assert_eq!(
//!     export_fasta(&reads).unwrap(),
//!     ">seq1\nATCGATCGATCGATCG\n>seq2\nGGGGGGGGGGGG"
//! );
//! ```
pub mod config;
pub mod errors;
pub mod filter;
pub mod matcher;
pub mod parser;
pub mod pipeline;
pub mod quality;
pub mod store;
pub mod trim;

#[cfg(any(feature = "python", feature = "python_test"))]
mod python;

pub use config::ProcessingConfig;
pub use errors::{Error, ErrorKind, Result};
pub use filter::ProcessedRecord;
pub use parser::{detect_format, FastxReader, Format, SequenceRecord};
#[cfg(feature = "parallel")]
pub use pipeline::{preprocess_parallel, preprocess_text_parallel};
pub use pipeline::{export_fasta, preprocess, preprocess_text, write_fasta_records};
pub use store::{preprocess_stored, MemoryStore, PayloadHandle, PayloadStore};
