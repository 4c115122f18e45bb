use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use zstd::zstd_safe;

use crate::{Error, Result};

// Large enough for any zstd frame header (ZSTD_FRAMEHEADERSIZE_MAX).
const FRAME_HEADER_MAX: usize = 18;

/// A compressed input file, opened and ready to be split.
#[derive(Debug)]
pub struct Input {
    file: File,
    path: PathBuf,
    compressed_size: u64,
    content_size: Option<u64>,
}

impl Input {
    /// Opens `path` and inspects the header of its first frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file can't be opened, inspected or rewound.  The contents are
    /// not validated here; corrupt data only shows up when the stream is split.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source| Error::Open {
            path: path.to_owned(),
            source,
        };

        let mut file = File::open(path).map_err(open_error)?;
        let compressed_size = file.metadata().map_err(open_error)?.len();
        let content_size = peek_content_size(&mut file).map_err(open_error)?;

        Ok(Self {
            file,
            path: path.to_owned(),
            compressed_size,
            content_size,
        })
    }

    /// The path the input was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The size of the compressed file.
    #[must_use]
    pub const fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// The decompressed size declared by the first frame header, if there is one.  Streaming
    /// encoders usually leave it out, and inputs made of several frames declare only the first
    /// frame's size, so this is a hint for progress display only.
    #[must_use]
    pub const fn content_size(&self) -> Option<u64> {
        self.content_size
    }

    /// Gives up the file, positioned at the start.
    #[must_use]
    pub fn into_file(self) -> File {
        self.file
    }
}

fn peek_content_size(file: &mut File) -> io::Result<Option<u64>> {
    let mut header = Vec::with_capacity(FRAME_HEADER_MAX);
    file.by_ref()
        .take(FRAME_HEADER_MAX as u64)
        .read_to_end(&mut header)?;
    file.seek(SeekFrom::Start(0))?;

    Ok(zstd_safe::get_frame_content_size(&header).ok().flatten())
}
