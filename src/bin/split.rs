//! Decompresses a `.zst` archive into a directory of numbered, size-bounded files
//!
//! `zst-split lichess_db_standard_rated_2024-10.pgn.zst split_pgn_files_2024_10` produces
//! `lichess_part_01.pgn`, `lichess_part_02.pgn`, ... of about 5 GiB each.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::HumanBytes;

use zst_split::{Input, SegmentFiles, SplitConfig, parse_size};

mod cli;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The compressed archive
    input: PathBuf,

    /// Directory receiving the segments (created if missing)
    output_dir: PathBuf,

    /// Start a new segment once the current one holds at least this much
    #[arg(short, long, default_value = "5GiB", value_parser = size)]
    max_segment_size: u64,

    /// How much decompressed data to read and write at a time
    #[arg(short, long, default_value = "1MiB", value_parser = size)]
    read_chunk_size: u64,

    /// Write everything to a single segment
    #[arg(long, conflicts_with = "max_segment_size")]
    no_split: bool,

    /// File name prefix of each segment
    #[arg(long, default_value = SegmentFiles::DEFAULT_PREFIX)]
    prefix: String,

    /// File name extension of each segment (without the dot)
    #[arg(long, default_value = SegmentFiles::DEFAULT_EXTENSION)]
    extension: String,

    /// Minimum number of digits in segment numbers
    #[arg(long, default_value_t = SegmentFiles::MIN_WIDTH)]
    index_width: usize,

    /// Also write a JSON summary of the segments to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Don't draw a progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn size(text: &str) -> Result<u64, String> {
    parse_size(text).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();

    let read_chunk_size =
        usize::try_from(args.read_chunk_size).context("Read chunk size is too large")?;
    let max_segment_size = (!args.no_split).then_some(args.max_segment_size);
    let config = SplitConfig::new(max_segment_size, read_chunk_size)?;

    let input = Input::open(&args.input).context("Unable to open input")?;
    println!(
        "Input {} is {}",
        args.input.display(),
        HumanBytes(input.compressed_size())
    );

    let mut segments = SegmentFiles::new(&args.output_dir, args.prefix, args.extension)?
        .with_width(args.index_width);

    let progress = cli::progress_bar(&input, args.quiet)?;
    let report = zst_split::split(input.into_file(), &mut segments, &config, progress.clone())
        .with_context(|| format!("Failed to split {}", args.input.display()))?;
    progress.finish_and_clear();

    println!(
        "Wrote {} in {} segment(s) to {}",
        HumanBytes(report.decompressed_bytes),
        report.segments.len(),
        segments.dir().display()
    );

    if let Some(path) = args.report {
        fs::write(&path, report.to_json()?)
            .with_context(|| format!("Unable to write report to {}", path.display()))?;
    }

    Ok(())
}
