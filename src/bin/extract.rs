//! Decompresses a `.zst` archive into a single file, or to stdout
//! Should produce the exact same output as `zstdcat` on the same file

use std::{
    io::{self, StdoutLock},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::HumanBytes;

use zst_split::{Input, SinkFactory, SplitConfig, parse_size};

mod cli;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The compressed archive
    input: PathBuf,

    /// Where to write the decompressed data (stdout if omitted)
    output: Option<PathBuf>,

    /// How much decompressed data to read and write at a time
    #[arg(short, long, default_value = "1MiB", value_parser = size)]
    read_chunk_size: u64,

    /// Don't draw a progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn size(text: &str) -> Result<u64, String> {
    parse_size(text).map_err(|err| err.to_string())
}

#[derive(Debug)]
struct Stdout;

impl SinkFactory for Stdout {
    type Sink = StdoutLock<'static>;

    fn create(&mut self, _index: u32) -> io::Result<Self::Sink> {
        Ok(io::stdout().lock())
    }

    fn location(&self, _index: u32) -> PathBuf {
        PathBuf::from("<stdout>")
    }
}

fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();

    let read_chunk_size =
        usize::try_from(args.read_chunk_size).context("Read chunk size is too large")?;
    let input = Input::open(&args.input).context("Unable to open input")?;

    let Some(output) = args.output else {
        let config = SplitConfig::new(None, read_chunk_size)?;
        // Like zstdcat, stop quietly when the reader on the other end of the pipe goes away.
        return match zst_split::split(input.into_file(), &mut Stdout, &config, ()) {
            Err(err) if !err.is_broken_pipe() => Err(err)
                .with_context(|| format!("Failed to decompress {}", args.input.display())),
            _ => Ok(()),
        };
    };

    eprintln!(
        "Decompressing {} ({}) to {}",
        args.input.display(),
        HumanBytes(input.compressed_size()),
        output.display()
    );

    let progress = cli::progress_bar(&input, args.quiet)?;
    let report = zst_split::decompress_file(input, output, read_chunk_size, progress.clone())
        .with_context(|| format!("Failed to decompress {}", args.input.display()))?;
    progress.finish_and_clear();

    eprintln!(
        "Decompression complete: {}",
        HumanBytes(report.decompressed_bytes)
    );

    Ok(())
}
