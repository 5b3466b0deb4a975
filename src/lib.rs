//! # dnapack
//!
//! Compact 2-bit storage of fixed-length read prefixes.
//!
//! Reads from a FASTQ stream are filtered, truncated to their first `kmer_length`
//! bases, and packed four nucleotides per byte into a header-less binary file.
//!
//! - [`codec`] packs and unpacks 2-bit symbols.
//! - [`ingest`] runs the FASTQ filtering pipeline that feeds the codec.
//! - [`batch`] drives ingestion over a manifest of input files with a CSV run log.
//!
//! The packed file stores no length: the number of symbols written is reported in
//! the [`RunSummary`] and must be kept by the consumer to decode the file.

pub mod batch;
pub mod codec;
mod error;
pub mod fastq;
pub mod ingest;
mod nucleotide;
mod policy;

pub use batch::{Batch, BatchOutcome};
pub use error::{ConfigError, Error, IngestError, ReadError, Result};
pub use ingest::{IngestConfig, IngestConfigBuilder, Ingestor, RunStatus, RunSummary};
pub use nucleotide::{codes_to_ascii, Nucleotide, AMBIGUITY_MARKER};
pub use policy::Policy;
