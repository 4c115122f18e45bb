use std::path::PathBuf;

use serde::Serialize;

/// A closed output segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// The 1-based position of this segment in the output sequence.
    pub index: u32,

    /// Where the segment was written.
    pub path: PathBuf,

    /// The number of decompressed bytes in the segment.
    pub bytes: u64,
}

/// The outcome of a successful split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Every segment, in index order.  Concatenating them reproduces the decompressed stream.
    pub segments: Vec<Segment>,

    /// Compressed bytes read from the source.
    pub compressed_bytes: u64,

    /// Decompressed bytes written across all segments.
    pub decompressed_bytes: u64,
}

impl SplitReport {
    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails only if a segment path isn't valid UTF-8.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
