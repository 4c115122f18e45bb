// Helpers shared by the command-line tools.

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use zst_split::Input;

// Logs go to stderr, filtered by RUST_LOG, quiet by default so the progress bar stays readable.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

// Counts decompressed bytes.  The total is only known when the first frame header declares it.
pub fn progress_bar(input: &Input, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let progress = if let Some(total) = input.content_size() {
        let progress = ProgressBar::new(total);
        progress.set_style(ProgressStyle::with_template(
            "[eta {eta}] {bar:40.cyan/blue} {binary_bytes:>9}/{binary_total_bytes:9} {binary_bytes_per_sec} {msg}",
        )?);
        progress
    } else {
        let progress = ProgressBar::no_length();
        progress.set_style(ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {binary_bytes:>9} {binary_bytes_per_sec} {msg}",
        )?);
        progress
    };
    progress.set_message("Decompressing");
    progress.enable_steady_tick(Duration::from_millis(100));

    Ok(progress)
}
