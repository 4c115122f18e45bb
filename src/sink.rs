use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// Creates the writable destination for each segment.
///
/// The splitter calls [`create()`](Self::create) with consecutive indices starting at 1, writes
/// into the returned sink, and hands it back to [`close()`](Self::close) before creating the next
/// one.
pub trait SinkFactory {
    /// The writer for a single segment.
    type Sink: Write;

    /// Creates the sink for segment `index`.
    ///
    /// # Errors
    ///
    /// Any I/O failure while creating the destination.
    fn create(&mut self, index: u32) -> io::Result<Self::Sink>;

    /// Finishes segment `index`.  The default implementation flushes the sink and drops it.
    ///
    /// # Errors
    ///
    /// Any I/O failure while flushing or closing.
    fn close(&mut self, index: u32, mut sink: Self::Sink) -> io::Result<()> {
        let _ = index;
        sink.flush()
    }

    /// Where segment `index` ends up.  This is used for reports and error messages.
    fn location(&self, index: u32) -> PathBuf;
}

/// Writes segments as numbered files in a directory: `{prefix}_{index}.{extension}`, with the
/// index zero-padded to at least two digits (`lichess_part_01.pgn`, `lichess_part_02.pgn`, ...).
#[derive(Debug, Clone)]
pub struct SegmentFiles {
    dir: PathBuf,
    prefix: String,
    extension: String,
    width: usize,
}

impl SegmentFiles {
    /// The file name prefix used when none is given.
    pub const DEFAULT_PREFIX: &'static str = "lichess_part";
    /// The file extension used when none is given.
    pub const DEFAULT_EXTENSION: &'static str = "pgn";
    /// The minimum number of digits in a segment index.
    pub const MIN_WIDTH: usize = 2;

    /// Prepares `dir` to receive segments, creating it (and its parents) if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDir`] if the directory can't be created.
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| Error::OutputDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            prefix: prefix.into(),
            extension: extension.into(),
            width: Self::MIN_WIDTH,
        })
    }

    /// Pads indices to `width` digits.  Widths below two are raised to two.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(Self::MIN_WIDTH);
        self
    }

    /// The directory receiving the segments.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self, index: u32) -> String {
        let width = self.width;
        if self.extension.is_empty() {
            format!("{}_{index:0width$}", self.prefix)
        } else {
            format!("{}_{index:0width$}.{}", self.prefix, self.extension)
        }
    }
}

impl SinkFactory for SegmentFiles {
    type Sink = File;

    fn create(&mut self, index: u32) -> io::Result<File> {
        File::create(self.location(index))
    }

    fn close(&mut self, _index: u32, mut sink: File) -> io::Result<()> {
        sink.flush()?;
        sink.sync_all()
    }

    fn location(&self, index: u32) -> PathBuf {
        self.dir.join(self.file_name(index))
    }
}

/// Writes the whole stream to one file.  Meant for unbounded splits, which only ever create
/// segment 1.
#[derive(Debug, Clone)]
pub struct SingleFile {
    path: PathBuf,
}

impl SingleFile {
    /// Prepares `path` to receive the output, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDir`] if the parent directory can't be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::OutputDir {
                path: parent.to_owned(),
                source,
            })?;
        }
        Ok(Self { path })
    }
}

impl SinkFactory for SingleFile {
    type Sink = File;

    fn create(&mut self, _index: u32) -> io::Result<File> {
        File::create(&self.path)
    }

    fn close(&mut self, _index: u32, mut sink: File) -> io::Result<()> {
        sink.flush()?;
        sink.sync_all()
    }

    fn location(&self, _index: u32) -> PathBuf {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_zero_padded() {
        let dir = tempfile::tempdir().unwrap();
        let files = SegmentFiles::new(dir.path(), "lichess_part", "pgn").unwrap();

        assert_eq!(files.location(1), dir.path().join("lichess_part_01.pgn"));
        assert_eq!(files.location(12), dir.path().join("lichess_part_12.pgn"));
        assert_eq!(files.location(123), dir.path().join("lichess_part_123.pgn"));

        let files = files.with_width(4);
        assert_eq!(files.location(7), dir.path().join("lichess_part_0007.pgn"));
        let files = files.with_width(0);
        assert_eq!(files.location(7), dir.path().join("lichess_part_07.pgn"));
    }

    #[test]
    fn empty_extension_has_no_dot() {
        let dir = tempfile::tempdir().unwrap();
        let files = SegmentFiles::new(dir.path(), "games", "").unwrap();
        assert_eq!(files.location(3), dir.path().join("games_03"));
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("split").join("2024-10");

        let mut files = SegmentFiles::new(&nested, "part", "pgn").unwrap();
        assert!(nested.is_dir());
        let sink = files.create(1).unwrap();
        files.close(1, sink).unwrap();
        assert!(nested.join("part_01.pgn").is_file());

        let target = dir.path().join("out").join("games.pgn");
        let mut single = SingleFile::new(&target).unwrap();
        assert_eq!(single.location(1), target);
        let sink = single.create(1).unwrap();
        single.close(1, sink).unwrap();
        assert!(target.is_file());
    }

    #[test]
    fn unusable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();

        let err = SegmentFiles::new(file.join("sub"), "part", "pgn").unwrap_err();
        assert!(matches!(err, Error::OutputDir { .. }), "{err:?}");
    }
}
