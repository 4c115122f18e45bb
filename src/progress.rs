use indicatif::{HumanBytes, ProgressBar};

use crate::Segment;

/// Receives progress notifications from the splitter.  Reporting never affects the output.
pub trait Progress {
    /// `bytes` more decompressed bytes have been written.
    fn advance(&mut self, bytes: u64);

    /// A segment has been closed and is complete.
    fn segment_closed(&mut self, segment: &Segment) {
        let _ = segment;
    }
}

/// Discards all progress.
impl Progress for () {
    fn advance(&mut self, _bytes: u64) {}
}

impl Progress for ProgressBar {
    fn advance(&mut self, bytes: u64) {
        self.inc(bytes);
    }

    fn segment_closed(&mut self, segment: &Segment) {
        self.println(format!(
            "Saved: {} ({})",
            segment.path.display(),
            HumanBytes(segment.bytes)
        ));
    }
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn advance(&mut self, bytes: u64) {
        (**self).advance(bytes);
    }

    fn segment_closed(&mut self, segment: &Segment) {
        (**self).segment_closed(segment);
    }
}
