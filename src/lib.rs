//! Stream-decompress a zstd archive (such as a Lichess `.pgn.zst` database dump) into a sequence
//! of size-bounded output segments.
//!
//! The decompressed stream is read in fixed-size blocks.  Each block is appended whole to the
//! current segment; once a segment holds at least the configured maximum, it is closed and the
//! next block goes to a new segment.  Concatenating the segments in index order reproduces the
//! decompressed stream exactly.
mod config;
mod cursor;
mod error;
mod input;
mod progress;
mod report;
mod sink;
#[cfg(test)]
mod testing;

use std::{
    io::{Read, Write},
    path::PathBuf,
};

use tracing::{debug, info};

pub use self::{
    config::{
        DEFAULT_MAX_SEGMENT_BYTES, DEFAULT_READ_CHUNK_SIZE, GIB, KIB, MIB, SplitConfig, TIB,
        parse_size,
    },
    cursor::DecompressionCursor,
    error::{Error, Result, SinkAction},
    input::Input,
    progress::Progress,
    report::{Segment, SplitReport},
    sink::{SegmentFiles, SingleFile, SinkFactory},
};

/// Decompresses `source` and writes the result across segments created by `sinks`.
///
/// Segments are numbered from 1.  After each block is written, the current segment is rotated if
/// it now holds at least [`SplitConfig::max_segment_bytes()`].  The last segment is always closed,
/// even when it's empty: an input whose decompressed size is an exact multiple of the limit ends
/// with an empty segment, and an empty input produces a single empty segment.
///
/// # Errors
///
/// - [`Error::CorruptStream`] if `source` isn't valid zstd data or ends mid-frame.
/// - [`Error::Input`] if reading `source` fails.
/// - [`Error::Output`] if a segment can't be created, written or closed.
/// - [`Error::InvalidConfig`] if the limit is so small that segment numbers would run out.
///
/// Nothing is rolled back: segments closed before the failure stay complete, and the segment being
/// written is left as it is.
pub fn split<R: Read, F: SinkFactory>(
    source: R,
    sinks: &mut F,
    config: &SplitConfig,
    mut progress: impl Progress,
) -> Result<SplitReport> {
    let mut cursor = DecompressionCursor::new(source)?;
    let mut block = vec![0u8; config.read_chunk_size()];
    let mut segments = vec![];

    let mut index = 1;
    let mut sink = open_segment(sinks, index)?;
    let mut written = 0;

    loop {
        let n = cursor.next_block(&mut block)?;
        if n == 0 {
            break;
        }

        sink.write_all(&block[..n])
            .map_err(|e| Error::output(SinkAction::Write, index, sinks.location(index), e))?;
        written += n as u64;
        progress.advance(n as u64);

        if config.limit_reached(written) {
            let segment = close_segment(sinks, index, sink, written)?;
            progress.segment_closed(&segment);
            segments.push(segment);

            index = next_index(index)?;
            sink = open_segment(sinks, index)?;
            written = 0;
        }
    }

    let segment = close_segment(sinks, index, sink, written)?;
    progress.segment_closed(&segment);
    segments.push(segment);

    Ok(SplitReport {
        segments,
        compressed_bytes: cursor.compressed_bytes(),
        decompressed_bytes: cursor.decompressed_bytes(),
    })
}

fn next_index(index: u32) -> Result<u32> {
    index.checked_add(1).ok_or_else(|| {
        Error::InvalidConfig(format!(
            "more than {index} segments; raise the maximum segment size"
        ))
    })
}

fn open_segment<F: SinkFactory>(sinks: &mut F, index: u32) -> Result<F::Sink> {
    let path = sinks.location(index);
    debug!(index, path = %path.display(), "opening segment");
    sinks
        .create(index)
        .map_err(|e| Error::output(SinkAction::Create, index, path, e))
}

fn close_segment<F: SinkFactory>(
    sinks: &mut F,
    index: u32,
    sink: F::Sink,
    bytes: u64,
) -> Result<Segment> {
    let path: PathBuf = sinks.location(index);
    sinks
        .close(index, sink)
        .map_err(|e| Error::output(SinkAction::Close, index, path.clone(), e))?;
    info!(index, path = %path.display(), bytes, "segment complete");
    Ok(Segment { index, path, bytes })
}

/// Decompresses the whole of `input` into the single file `output`, without rotation.
///
/// # Errors
///
/// As for [`split()`], plus [`Error::OutputDir`] if the parent of `output` can't be created.
pub fn decompress_file(
    input: Input,
    output: impl Into<PathBuf>,
    read_chunk_size: usize,
    progress: impl Progress,
) -> Result<SplitReport> {
    let config = SplitConfig::new(None, read_chunk_size)?;
    let mut sink = SingleFile::new(output)?;
    split(input.into_file(), &mut sink, &config, progress)
}
