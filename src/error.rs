use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The step at which writing a segment failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkAction {
    /// Creating (opening) the segment.
    Create,
    /// Appending a decompressed block to the segment.
    Write,
    /// Flushing and closing the segment.
    Close,
}

impl SinkAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Close => "close",
        }
    }
}

impl std::fmt::Display for SinkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while splitting a compressed stream.
///
/// None of these are recoverable locally.  Segments that were closed before the failure remain
/// complete; the segment being written at the time is left as the failed write left it.
#[derive(Debug, Error)]
pub enum Error {
    /// The compressed input is not a valid zstd stream, or it ends in the middle of a frame.
    #[error(
        "corrupt zstd stream after {compressed_offset} compressed bytes \
         ({decompressed_offset} bytes decompressed)"
    )]
    CorruptStream {
        /// Compressed bytes pulled from the source before the failure.
        compressed_offset: u64,
        /// Decompressed bytes produced before the failure.
        decompressed_offset: u64,
        /// The decoder's error.
        #[source]
        source: io::Error,
    },

    /// The zstd decompression context could not be set up.
    #[error("failed to set up the zstd decoder")]
    Decoder(#[source] io::Error),

    /// The compressed input could not be opened or inspected.
    #[error("failed to open compressed input {path:?}")]
    Open {
        /// The input file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The directory that receives the segments could not be created.
    #[error("failed to create output directory {path:?}")]
    OutputDir {
        /// The directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Reading the compressed input failed.
    #[error("failed to read compressed input after {offset} bytes")]
    Input {
        /// Compressed bytes successfully read before the failure.
        offset: u64,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A segment could not be created, written or closed.
    #[error("failed to {action} segment {index} at {path:?}")]
    Output {
        /// What was being done to the segment.
        action: SinkAction,
        /// The 1-based segment index.
        index: u32,
        /// Where the segment lives.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A size or other setting was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True if the failure was caused by malformed or truncated compressed data rather than by
    /// the environment.
    #[must_use]
    pub const fn is_corrupt_stream(&self) -> bool {
        matches!(self, Self::CorruptStream { .. })
    }

    /// True if a reader downstream of the output went away (for example `... | head`), which
    /// surfaces as a broken pipe anywhere in the error's source chain.
    #[must_use]
    pub fn is_broken_pipe(&self) -> bool {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = source {
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|err| err.kind() == io::ErrorKind::BrokenPipe)
            {
                return true;
            }
            source = err.source();
        }
        false
    }

    pub(crate) fn output(
        action: SinkAction,
        index: u32,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Output {
            action,
            index,
            path: path.into(),
            source,
        }
    }
}
