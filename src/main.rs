#[macro_use]
extern crate log;

use std::{
    fs::File,
    io::{stdout, BufWriter, Write},
    path::Path,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use dnapack::{codec::PackedFile, Batch, BatchOutcome, Ingestor, Nucleotide};

mod cli;

use cli::{Cli, Commands};

/// Creates a `BufWriter` for the given output option, defaulting to standard output
fn get_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Could not create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(stdout())),
    };
    Ok(writer)
}

/// Writes `count` symbols of `input` as ASCII bases, `width` per line
fn unpack(input: &Path, count: usize, width: usize, output: Option<&Path>) -> Result<()> {
    let packed = PackedFile::open(input, count)
        .with_context(|| format!("Could not open packed file {}", input.display()))?;
    let mut writer = get_writer(output)?;

    let line_width = if width == 0 { count.max(1) } else { width };
    let mut line = Vec::with_capacity(line_width + 1);
    for symbol in packed.symbols() {
        line.push(Nucleotide::from_code(symbol?).to_ascii());
        if line.len() == line_width {
            line.push(b'\n');
            writer.write_all(&line)?;
            line.clear();
        }
    }
    if !line.is_empty() {
        line.push(b'\n');
        writer.write_all(&line)?;
    }
    writer.flush()?;
    Ok(())
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Pack {
            fastq,
            output,
            ingest,
        } => {
            let ingestor = Ingestor::new(ingest.config()?);
            let summary = ingestor
                .run_path(fastq, output)
                .with_context(|| format!("Failed to pack {}", fastq.display()))?;
            if !summary.is_skipped() {
                info!(
                    "Kept {} of {} reads, total bases: {}",
                    summary.stats.kept, summary.stats.records, summary.total_bases
                );
            }
        }
        Commands::Batch {
            input,
            log,
            out_dir,
            threads,
            ingest,
        } => {
            let batch = Batch::new(Ingestor::new(ingest.config()?))
                .out_dir(out_dir)
                .num_threads(*threads);
            match batch.run(input, log)? {
                BatchOutcome::LogExists => {}
                BatchOutcome::Completed(summaries) => {
                    let total: usize = summaries.iter().map(|s| s.total_bases).sum();
                    info!(
                        "Completed {} runs ({} bases) logged to {}",
                        summaries.len(),
                        total,
                        log.display()
                    );
                }
            }
        }
        Commands::Unpack {
            input,
            count,
            width,
            output,
        } => {
            unpack(input, *count, *width, output.as_deref())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
