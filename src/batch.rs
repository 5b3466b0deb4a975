//! Batch ingestion of many FASTQ files
//!
//! A manifest lists one input path per line. Each input is packed to
//! `<out_dir>/<file name>.bin` and one row per run is appended to a CSV run log.
//! Runs whose output already exists are skipped, so an interrupted batch can be
//! resumed by deleting its log and starting it again.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Serialize, Serializer};

use crate::{
    error::ConfigError,
    ingest::{Ingestor, RunSummary},
    Result,
};

/// Extension appended to the file name of each input
pub const OUTPUT_EXTENSION: &str = ".bin";

/// One row of the run log
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    #[serde(serialize_with = "raw_bytes")]
    file_path: &'a [u8],
    total_base: usize,
}

/// Writes a path as its raw bytes so non UTF-8 names survive in the log
fn raw_bytes<S: Serializer>(
    bytes: &&[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_bytes(bytes)
}

/// CSV log with one row per completed run, flushed after every row
pub struct RunLog {
    wtr: csv::Writer<File>,
}
impl RunLog {
    /// Creates the log file and writes its header
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        wtr.write_record(["file_path", "total_base"])?;
        wtr.flush()?;
        Ok(Self { wtr })
    }

    pub fn append(&mut self, summary: &RunSummary) -> Result<()> {
        self.wtr.serialize(LogRecord {
            file_path: summary.output_path.as_os_str().as_encoded_bytes(),
            total_base: summary.total_bases,
        })?;
        self.wtr.flush()?;
        Ok(())
    }
}

/// Result of a batch invocation
#[derive(Debug)]
pub enum BatchOutcome {
    /// The run log already existed, nothing was done
    LogExists,
    /// Every input was processed (or skipped because its output existed)
    Completed(Vec<RunSummary>),
}

/// Reads the input paths listed in a manifest, skipping blank lines
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let reader = BufReader::new(File::open(path)?);
    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.trim().is_empty() {
            inputs.push(PathBuf::from(line));
        }
    }
    Ok(inputs)
}

/// Output location for `input`: its file name with [`OUTPUT_EXTENSION`] appended, inside `out_dir`
#[must_use]
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(OUTPUT_EXTENSION);
    out_dir.join(name)
}

/// Runs one [`Ingestor`] over every input of a manifest
#[derive(Debug, Clone)]
pub struct Batch {
    ingestor: Ingestor,
    out_dir: PathBuf,
    num_threads: usize,
}
impl Batch {
    /// Creates a sequential batch writing into the current directory
    #[must_use]
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            ingestor,
            out_dir: PathBuf::from("."),
            num_threads: 1,
        }
    }

    #[must_use]
    pub fn out_dir<P: Into<PathBuf>>(mut self, out_dir: P) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Number of files processed concurrently, `0` uses every available core
    #[must_use]
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Processes every input listed in `manifest`, logging each run to `log_path`
    ///
    /// Does nothing if `log_path` already exists. Stops at the first fatal run error.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        manifest: P,
        log_path: Q,
    ) -> Result<BatchOutcome> {
        let log_path = log_path.as_ref();
        if log_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingPath("run log").into());
        }
        if log_path.try_exists()? {
            log::info!("Log file `{}` exists, exit.", log_path.display());
            return Ok(BatchOutcome::LogExists);
        }

        let inputs = read_manifest(manifest)?;
        let run_log = Mutex::new(RunLog::create(log_path)?);
        log::info!("Processing {} input files", inputs.len());

        let summaries = self.run_inputs(&inputs, &run_log)?;
        Ok(BatchOutcome::Completed(summaries))
    }

    /// Packs the given inputs in order, logging each completed run
    pub fn run_inputs(
        &self,
        inputs: &[PathBuf],
        run_log: &Mutex<RunLog>,
    ) -> Result<Vec<RunSummary>> {
        let num_threads = if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
        .min(inputs.len())
        .max(1);

        if num_threads == 1 {
            return inputs
                .iter()
                .map(|input| self.process(input, run_log))
                .collect();
        }

        let inputs_per_thread = inputs.len().div_ceil(num_threads);
        let failed = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .chunks(inputs_per_thread)
                .map(|chunk| {
                    let failed = &failed;
                    scope.spawn(move || -> Result<Vec<RunSummary>> {
                        let mut summaries = Vec::with_capacity(chunk.len());
                        for input in chunk {
                            if failed.load(Ordering::Relaxed) {
                                break;
                            }
                            match self.process(input, run_log) {
                                Ok(summary) => summaries.push(summary),
                                Err(e) => {
                                    failed.store(true, Ordering::Relaxed);
                                    return Err(e);
                                }
                            }
                        }
                        Ok(summaries)
                    })
                })
                .collect();

            let mut summaries = Vec::with_capacity(inputs.len());
            let mut first_error = None;
            for handle in handles {
                match handle.join().expect("Error joining batch worker") {
                    Ok(chunk) => summaries.extend(chunk),
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(summaries),
            }
        })
    }

    fn process(&self, input: &Path, run_log: &Mutex<RunLog>) -> Result<RunSummary> {
        let output = output_path_for(input, &self.out_dir);
        let summary = self.ingestor.run_path(input, &output)?;
        run_log.lock().append(&summary)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod testing {

    use std::fs;

    use super::*;
    use crate::IngestConfig;
    use anyhow::Result;

    const RECORD: &str = "@r\nACGTACGTACGTACGTACGTACGTACGTACGT\n+\nIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIII\n";

    #[test]
    fn test_output_naming() {
        let out = output_path_for(Path::new("/data/run1/sample.fastq.gz"), Path::new("packed"));
        assert_eq!(out, PathBuf::from("packed/sample.fastq.gz.bin"));
    }

    #[test]
    fn test_manifest_skips_blank_lines() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let manifest = dir.path().join("inputs.txt");
        fs::write(&manifest, "a.fastq\r\n\nb.fastq\n   \n")?;
        assert_eq!(
            read_manifest(&manifest)?,
            vec![PathBuf::from("a.fastq"), PathBuf::from("b.fastq")]
        );
        Ok(())
    }

    #[test]
    fn test_log_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("one.fastq");
        fs::write(&input, RECORD.repeat(3))?;
        let manifest = dir.path().join("inputs.txt");
        fs::write(&manifest, format!("{}\n", input.display()))?;
        let log = dir.path().join("log.csv");

        let batch = Batch::new(Ingestor::new(IngestConfig::new(10, 32)?)).out_dir(dir.path());
        let outcome = batch.run(&manifest, &log)?;
        let BatchOutcome::Completed(summaries) = outcome else {
            panic!("expected a completed batch");
        };
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_bases, 96);

        let text = fs::read_to_string(&log)?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("file_path,total_base"));
        assert!(lines.next().is_some_and(|row| row.ends_with("one.fastq.bin,96")));

        // a second invocation sees the log and does nothing
        assert!(matches!(batch.run(&manifest, &log)?, BatchOutcome::LogExists));
        Ok(())
    }

    #[test]
    fn test_threaded_duplicate_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut listed = String::new();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub))?;
            let input = dir.path().join(sub).join("s.fastq");
            fs::write(&input, RECORD.repeat(2000))?;
            listed.push_str(&format!("{}\n", input.display()));
        }
        let manifest = dir.path().join("inputs.txt");
        fs::write(&manifest, listed)?;
        let out_dir = dir.path().join("packed");
        fs::create_dir(&out_dir)?;
        let log = dir.path().join("log.csv");

        let batch = Batch::new(Ingestor::new(IngestConfig::new(1000, 32)?))
            .out_dir(&out_dir)
            .num_threads(2);
        let BatchOutcome::Completed(summaries) = batch.run(&manifest, &log)? else {
            panic!("expected a completed batch");
        };

        // whichever run finishes second is skipped, as in a sequential batch
        let mut totals: Vec<_> = summaries.iter().map(|s| s.total_bases).collect();
        totals.sort_unstable();
        assert_eq!(totals, vec![0, 32_000]);
        assert_eq!(summaries.iter().filter(|s| s.is_skipped()).count(), 1);
        assert_eq!(fs::read(out_dir.join("s.fastq.bin"))?.len(), 8_000);
        assert_eq!(fs::read_dir(&out_dir)?.count(), 1);
        assert_eq!(fs::read_to_string(&log)?.lines().count(), 3);
        Ok(())
    }

    #[test]
    fn test_threaded_failure_stops_batch() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let bad = dir.path().join("bad.fastq");
        fs::write(
            &bad,
            "@r\nACGTACGTACGTACGTACGTACGTACGTACGR\n+\nIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIII\n",
        )?;
        let queued = dir.path().join("queued.fastq");
        fs::write(&queued, RECORD)?;
        let other = dir.path().join("other.fastq");
        fs::write(&other, RECORD)?;

        // two workers get [bad, queued] and [other]
        let manifest = dir.path().join("inputs.txt");
        fs::write(
            &manifest,
            format!("{}\n{}\n{}\n", bad.display(), queued.display(), other.display()),
        )?;
        let out_dir = dir.path().join("packed");
        fs::create_dir(&out_dir)?;
        let log = dir.path().join("log.csv");

        let batch = Batch::new(Ingestor::new(IngestConfig::new(10, 32)?))
            .out_dir(&out_dir)
            .num_threads(2);
        match batch.run(&manifest, &log) {
            Err(crate::Error::IngestError(crate::IngestError::InvalidBase { base, .. })) => {
                assert_eq!(base, 'R');
            }
            other => panic!("expected invalid base error, got {other:?}"),
        }

        assert!(!out_dir.join("bad.fastq.bin").exists());
        assert!(!out_dir.join("queued.fastq.bin").exists());
        let text = fs::read_to_string(&log)?;
        assert!(text.starts_with("file_path,total_base\n"));
        assert!(!text.contains("bad.fastq.bin"));
        assert!(!text.contains("queued.fastq.bin"));
        Ok(())
    }

    #[test]
    fn test_threaded_missing_input() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let present = dir.path().join("present.fastq");
        fs::write(&present, RECORD)?;
        let manifest = dir.path().join("inputs.txt");
        fs::write(
            &manifest,
            format!(
                "{}\n{}\n",
                dir.path().join("absent.fastq").display(),
                present.display()
            ),
        )?;
        let log = dir.path().join("log.csv");

        let batch = Batch::new(Ingestor::new(IngestConfig::new(10, 32)?))
            .out_dir(dir.path())
            .num_threads(2);
        assert!(batch.run(&manifest, &log).is_err());
        assert!(!dir.path().join("absent.fastq.bin").exists());
        assert!(!fs::read_to_string(&log)?.contains("absent.fastq.bin"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_log_keeps_raw_path_bytes() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir()?;
        let log = dir.path().join("log.csv");
        let name = OsStr::from_bytes(b"reads\xff.bin");
        let summary = RunSummary::already_exists(&dir.path().join(name));

        let mut run_log = RunLog::create(&log)?;
        run_log.append(&summary)?;
        drop(run_log);

        let bytes = fs::read(&log)?;
        let path = dir.path().join(name);
        let expected = [path.as_os_str().as_bytes(), b",0\n".as_slice()].concat();
        assert!(bytes.ends_with(&expected));
        Ok(())
    }
}
