use std::path::{Path, PathBuf};

/// Why reading stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The read quota was met before the end of the stream
    QuotaReached,
    /// The stream ended before the quota was met
    StreamExhausted,
}

/// Final state of a run that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The output already existed, nothing was read or written
    AlreadyExists,
    /// Reads were packed into a new output file
    Packed(StopReason),
}

/// Per-run record counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Complete records read from the stream
    pub records: usize,
    /// Records encoded into the output
    pub kept: usize,
    /// Records rejected for being too short
    pub too_short: usize,
    /// Records rejected for containing the ambiguity marker
    pub ambiguous: usize,
    /// Records dropped for an invalid base (only under [`crate::Policy::SkipRecord`])
    pub invalid: usize,
}
impl ReadStats {
    /// Records that were read but not kept
    #[must_use]
    pub fn filtered(&self) -> usize {
        self.too_short + self.ambiguous + self.invalid
    }
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Location of the packed output
    pub output_path: PathBuf,

    /// Number of symbols written (`kept * kmer_length`), zero for skipped runs
    pub total_bases: usize,

    pub status: RunStatus,

    pub stats: ReadStats,
}
impl RunSummary {
    pub(crate) fn already_exists(output: &Path) -> Self {
        Self {
            output_path: output.to_path_buf(),
            total_bases: 0,
            status: RunStatus::AlreadyExists,
            stats: ReadStats::default(),
        }
    }

    /// Whether the run was skipped because its output already existed
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.status == RunStatus::AlreadyExists
    }
}
