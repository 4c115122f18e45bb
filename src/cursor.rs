use std::io::{self, BufReader, ErrorKind, Read};

use zstd::stream::read::Decoder;

use crate::{Error, Result};

// Counts the compressed bytes handed to the decoder and remembers whether the source itself
// failed, so that decoder errors can be told apart from I/O errors on the input.
#[derive(Debug)]
struct CountingReader<R> {
    inner: R,
    bytes: u64,
    failed: bool,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => {
                self.bytes += n as u64;
                Ok(n)
            }
            Err(err) => {
                if err.kind() != ErrorKind::Interrupted {
                    self.failed = true;
                }
                Err(err)
            }
        }
    }
}

/// Yields the decompressed stream as a sequence of blocks.  Each block fills the caller's buffer
/// completely unless the stream ends first.  Concatenated frames decode as one stream.
pub struct DecompressionCursor<'a, R: Read> {
    decoder: Decoder<'a, BufReader<CountingReader<R>>>,
    produced: u64,
}

impl<R: Read> std::fmt::Debug for DecompressionCursor<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompressionCursor")
            .field("compressed", &self.compressed_bytes())
            .field("produced", &self.produced)
            .finish_non_exhaustive()
    }
}

impl<R: Read> DecompressionCursor<'static, R> {
    /// Starts decompressing `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoder`] if the zstd decompression context can't be allocated.
    pub fn new(source: R) -> Result<Self> {
        let source = CountingReader {
            inner: source,
            bytes: 0,
            failed: false,
        };
        let decoder = Decoder::new(source).map_err(Error::Decoder)?;
        Ok(Self {
            decoder,
            produced: 0,
        })
    }
}

impl<R: Read> DecompressionCursor<'_, R> {
    /// Fills `buf` with the next decompressed bytes and returns how many were written.  Zero means
    /// the stream is exhausted.
    ///
    /// # Errors
    ///
    /// [`Error::CorruptStream`] if the data isn't valid zstd or stops mid-frame, and
    /// [`Error::Input`] if the underlying source can't be read.
    pub fn next_block(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;

        while filled < buf.len() {
            match self.decoder.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    self.produced += filled as u64;
                    return self.classify(err).map(|()| filled);
                }
            }
        }

        self.produced += filled as u64;
        Ok(filled)
    }

    /// Compressed bytes pulled from the source so far.  The decoder reads ahead, so this can run
    /// slightly past what has actually been decoded.
    #[must_use]
    pub fn compressed_bytes(&self) -> u64 {
        self.decoder.get_ref().get_ref().bytes
    }

    /// Decompressed bytes returned so far.
    #[must_use]
    pub const fn decompressed_bytes(&self) -> u64 {
        self.produced
    }

    fn classify(&self, err: io::Error) -> Result<()> {
        let source = self.decoder.get_ref().get_ref();

        if source.failed {
            return Err(Error::Input {
                offset: source.bytes,
                source: err,
            });
        }

        // A zero-byte input holds no frame at all; treat it as an empty stream.
        if source.bytes == 0 && self.produced == 0 {
            return Ok(());
        }

        Err(Error::CorruptStream {
            compressed_offset: source.bytes,
            decompressed_offset: self.produced,
            source: err,
        })
    }
}
