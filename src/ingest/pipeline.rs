//! Streaming FASTQ ingestion
//!
//! A run reads 4-line records in order, filters them, translates the first
//! `kmer_length` bases of every kept read into the symbol buffer, and finally packs
//! the buffer to the output path.
//!
//! Output is written to a temporary file next to the target and moved into place
//! only after the whole stream was validated, so a failed run never leaves a
//! partial file behind.

use std::io::{BufRead, BufWriter, ErrorKind};
use std::path::Path;

use memchr::memchr;
use tempfile::NamedTempFile;

use super::buffer::{PushError, SymbolBuffer};
use super::config::IngestConfig;
use super::input::open_input;
use super::summary::{ReadStats, RunStatus, RunSummary, StopReason};
use crate::{codec, fastq::RecordReader, nucleotide::AMBIGUITY_MARKER, Result};

/// Symbols collected from one stream, ready to be packed
#[derive(Debug)]
pub struct Collected {
    pub buffer: SymbolBuffer,
    pub stats: ReadStats,
    pub stop: StopReason,
}

/// Runs the FASTQ ingestion pipeline with a fixed configuration
///
/// Every run owns its own symbol buffer, so one `Ingestor` can be shared between
/// threads that each process a different output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ingestor {
    config: IngestConfig,
}
impl Ingestor {
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Filters and translates a read stream into a symbol buffer
    ///
    /// Reading stops as soon as the read quota is met.
    pub fn collect<R: BufRead>(&self, stream: R) -> Result<Collected> {
        let kmer_length = self.config.kmer_length();
        let min_length = self.config.min_length();

        let mut buffer = SymbolBuffer::with_capacity(self.config.capacity())?;
        let mut stats = ReadStats::default();
        let mut stop = StopReason::StreamExhausted;

        let mut reader = RecordReader::new(stream);
        while let Some(record) = reader.next_record() {
            let record = record?;
            let seq = record.seq();

            if seq.len() < min_length {
                stats.too_short += 1;
                continue;
            }
            if memchr(AMBIGUITY_MARKER, seq).is_some() {
                stats.ambiguous += 1;
                continue;
            }

            match buffer.push_prefix(&seq[..kmer_length]) {
                Ok(()) => stats.kept += 1,
                Err(PushError::InvalidBase { position, base }) => {
                    self.config
                        .policy()
                        .handle(base, position, record.number(), seq)?;
                    stats.invalid += 1;
                    continue;
                }
                // the loop ends as soon as the buffer fills, and every push is the same size
                Err(PushError::Full) => unreachable!(),
            }

            if buffer.is_full() {
                stop = StopReason::QuotaReached;
                break;
            }
        }
        stats.records = reader.records_read();

        Ok(Collected {
            buffer,
            stats,
            stop,
        })
    }

    /// Ingests `stream` and packs the kept prefixes to `output`
    ///
    /// If `output` already exists the stream is not touched and a summary with zero
    /// bases is returned.
    pub fn run<R: BufRead, P: AsRef<Path>>(&self, stream: R, output: P) -> Result<RunSummary> {
        let output = output.as_ref();
        if output_exists(output)? {
            return Ok(RunSummary::already_exists(output));
        }
        self.pack_stream(stream, output)
    }

    /// Opens `input` and ingests it into `output`
    ///
    /// The output is checked before the input is opened, so a completed run is skipped
    /// even if its input has since disappeared.
    pub fn run_path<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<RunSummary> {
        let output = output.as_ref();
        if output_exists(output)? {
            return Ok(RunSummary::already_exists(output));
        }
        let stream = open_input(input)?;
        self.pack_stream(stream, output)
    }

    fn pack_stream<R: BufRead>(&self, stream: R, output: &Path) -> Result<RunSummary> {
        let Collected {
            buffer,
            stats,
            stop,
        } = self.collect(stream)?;

        log::debug!(
            "{}: {} records read, {} too short, {} ambiguous, {} invalid",
            output.display(),
            stats.records,
            stats.too_short,
            stats.ambiguous,
            stats.invalid
        );

        if !write_packed(buffer.as_slice(), output)? {
            log::info!("Output `{}` appeared during the run, skip it.", output.display());
            return Ok(RunSummary::already_exists(output));
        }
        let total_bases = stats.kept * self.config.kmer_length();
        log::info!(
            "Packed {} reads ({} bases) into {}",
            stats.kept,
            total_bases,
            output.display()
        );

        Ok(RunSummary {
            output_path: output.to_path_buf(),
            total_bases,
            status: RunStatus::Packed(stop),
            stats,
        })
    }
}

/// Ingests `stream` into `output` with the default filter and policy
pub fn run<R: BufRead, P: AsRef<Path>>(
    stream: R,
    output: P,
    read_quota: usize,
    kmer_length: usize,
) -> Result<RunSummary> {
    let config = IngestConfig::new(read_quota, kmer_length)?;
    Ingestor::new(config).run(stream, output)
}

fn output_exists(output: &Path) -> Result<bool> {
    if output.try_exists()? {
        log::info!("Output `{}` exists, skip it.", output.display());
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Packs `symbols` into a temporary file beside `output`, then moves it into place
///
/// Returns `false`, leaving `output` untouched and removing the temporary file, if a
/// file appeared at `output` in the meantime.
fn write_packed(symbols: &[u8], output: &Path) -> Result<bool> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        codec::encode(symbols, &mut writer)?;
    }
    match temp.persist_noclobber(output) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}
