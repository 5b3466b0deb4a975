//! # ingest
//!
//! Turns a FASTQ read stream into a packed file of fixed-length read prefixes.
//!
//! Each complete 4-line record is filtered (reads shorter than `max(32, kmer_length)`
//! bases or containing `N` are dropped), the first `kmer_length` bases of every kept read are translated
//! to 2-bit codes, and ingestion stops once `read_quota` reads were kept. The symbol
//! buffer is allocated once at `kmer_length * read_quota` and packed with the
//! [`codec`](crate::codec) at the end of the run.
//!
//! ## Usage
//!
//! ```rust
//! use dnapack::ingest;
//!
//! let fastq = b"@r1\nACGTACGTACGTACGTACGTACGTACGTACGT\n+\nIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIII\n";
//!
//! let dir = tempfile::tempdir().unwrap();
//! let output = dir.path().join("reads.bin");
//!
//! let summary = ingest::run(&fastq[..], &output, 1_000, 32).unwrap();
//! assert_eq!(summary.total_bases, 32);
//!
//! // Running again is a no-op
//! let summary = ingest::run(&fastq[..], &output, 1_000, 32).unwrap();
//! assert_eq!(summary.total_bases, 0);
//! ```

mod buffer;
mod config;
mod input;
mod pipeline;
mod summary;

pub use buffer::{PushError, SymbolBuffer};
pub use config::{
    IngestConfig, IngestConfigBuilder, DEFAULT_KMER_LENGTH, DEFAULT_READ_QUOTA, MIN_READ_LENGTH,
};
pub use input::{open_input, STDIN_PATH};
pub use pipeline::{run, Collected, Ingestor};
pub use summary::{ReadStats, RunStatus, RunSummary, StopReason};
