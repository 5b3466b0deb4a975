use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dnapack::ingest::{DEFAULT_KMER_LENGTH, DEFAULT_READ_QUOTA};
use dnapack::{IngestConfig, IngestConfigBuilder, Policy};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    version = VERSION,
    about = "Pack fixed-length read prefixes from FASTQ files into 2-bit binary files",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a single FASTQ file
    #[command(arg_required_else_help = true)]
    Pack {
        /// the input .fastq (optionally compressed), `-` for stdin
        #[arg(short = 'q', long)]
        fastq: PathBuf,

        /// the output packed file; the run is skipped if it already exists
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Pack every FASTQ file listed in a manifest, logging each run to a CSV file
    #[command(arg_required_else_help = true)]
    Batch {
        /// text file listing one FASTQ path per line
        #[arg(short, long)]
        input: PathBuf,

        /// CSV run log; the batch does nothing if it already exists
        #[arg(short, long)]
        log: PathBuf,

        /// directory receiving the `<file name>.bin` outputs
        #[arg(short = 'd', long, default_value = ".")]
        out_dir: PathBuf,

        /// number of files processed concurrently (0: all cores)
        #[arg(short, long, default_value_t = 1)]
        threads: usize,

        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Print the bases stored in a packed file
    #[command(arg_required_else_help = true)]
    Unpack {
        /// the packed file
        input: PathBuf,

        /// number of symbols stored in the file (the `total_base` of its run)
        #[arg(short, long)]
        count: usize,

        /// symbols per output line, usually the k-mer length (0: one line)
        #[arg(short, long, default_value_t = 0)]
        width: usize,

        /// the output text file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Clone, Copy)]
pub struct IngestArgs {
    /// number of accepted reads to pack
    #[arg(short = 'n', long, default_value_t = DEFAULT_READ_QUOTA)]
    pub reads: usize,

    /// number of leading bases kept from each read
    #[arg(short, long, default_value_t = DEFAULT_KMER_LENGTH)]
    pub kmer: usize,

    /// skip, instead of error, on reads with a non-ACGT base in the kept prefix
    #[arg(long)]
    pub skip_invalid: bool,
}
impl IngestArgs {
    pub fn config(self) -> dnapack::Result<IngestConfig> {
        let policy = if self.skip_invalid {
            Policy::SkipRecord
        } else {
            Policy::Abort
        };
        IngestConfigBuilder::default()
            .read_quota(self.reads)
            .kmer_length(self.kmer)
            .policy(policy)
            .build()
    }
}
