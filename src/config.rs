use crate::{Error, Result};

/// One kibibyte.
pub const KIB: u64 = 1024;
/// One mebibyte.
pub const MIB: u64 = 1024 * KIB;
/// One gibibyte.
pub const GIB: u64 = 1024 * MIB;
/// One tebibyte.
pub const TIB: u64 = 1024 * GIB;

/// The default rotation threshold: 5 GiB per segment.
pub const DEFAULT_MAX_SEGMENT_BYTES: u64 = 5 * GIB;

/// The default read granularity: 1 MiB per decompressed block.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024 * 1024;

/// Controls how a stream is split.
///
/// A segment keeps receiving whole blocks of `read_chunk_size` bytes until its size reaches or
/// exceeds `max_segment_bytes`, so segments can overshoot the limit by up to one block minus one
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    max_segment_bytes: Option<u64>,
    read_chunk_size: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_segment_bytes: Some(DEFAULT_MAX_SEGMENT_BYTES),
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl SplitConfig {
    /// Creates a configuration.  `None` for `max_segment_bytes` means a single, unbounded segment.
    ///
    /// # Errors
    ///
    /// Both sizes must be positive.
    pub fn new(max_segment_bytes: Option<u64>, read_chunk_size: usize) -> Result<Self> {
        if max_segment_bytes == Some(0) {
            return Err(Error::InvalidConfig(
                "maximum segment size must be positive".into(),
            ));
        }
        if read_chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "read chunk size must be positive".into(),
            ));
        }
        Ok(Self {
            max_segment_bytes,
            read_chunk_size,
        })
    }

    /// A configuration that never rotates, using the default read granularity.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_segment_bytes: None,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }

    /// The rotation threshold, or `None` when segments are unbounded.
    #[must_use]
    pub const fn max_segment_bytes(&self) -> Option<u64> {
        self.max_segment_bytes
    }

    /// How many decompressed bytes are pulled per block.
    #[must_use]
    pub const fn read_chunk_size(&self) -> usize {
        self.read_chunk_size
    }

    pub(crate) fn limit_reached(&self, written: u64) -> bool {
        self.max_segment_bytes.is_some_and(|max| written >= max)
    }
}

// Enough for sub-byte precision at every suffix, small enough that `fraction * TIB` fits in a u64.
const MAX_DECIMALS: usize = 6;

/// Parses a human-readable byte count such as `1048576`, `512K`, `5GiB` or `1.5G`.
///
/// Every suffix is binary (`G`, `GB` and `GiB` all mean 1024³ bytes).  At most six decimal places
/// are accepted.  Zero is rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if the number or the suffix can't be understood, if it has too
/// many decimal places, or if the
/// result is zero or doesn't fit in 64 bits.
pub fn parse_size(text: &str) -> Result<u64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);

    let multiplier = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => KIB,
        "m" | "mb" | "mib" => MIB,
        "g" | "gb" | "gib" => GIB,
        "t" | "tb" | "tib" => TIB,
        other => return Err(Error::InvalidConfig(format!("unknown size suffix {other:?}"))),
    };

    let bytes: Option<u64> = if let Some((whole, fraction)) = number.split_once('.') {
        if fraction.len() > MAX_DECIMALS {
            return Err(Error::InvalidConfig(format!(
                "size {text:?} has more than {MAX_DECIMALS} decimal places"
            )));
        }
        let whole = parse_digits(whole, text)?;
        let scale = 10u64.pow(u32::try_from(fraction.len()).unwrap_or(0));
        let fraction = parse_digits(fraction, text)?;
        whole
            .checked_mul(multiplier)
            .and_then(|w| {
                fraction
                    .checked_mul(multiplier)
                    .map(|f| f / scale)
                    .and_then(|f| w.checked_add(f))
            })
    } else {
        parse_digits(number, text)?.checked_mul(multiplier)
    };
    let bytes =
        bytes.ok_or_else(|| Error::InvalidConfig(format!("size {text:?} is too large")))?;

    if bytes == 0 {
        return Err(Error::InvalidConfig(format!("size {text:?} must be positive")));
    }
    Ok(bytes)
}

fn parse_digits(digits: &str, text: &str) -> Result<u64> {
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("invalid size {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_script() {
        let config = SplitConfig::default();
        assert_eq!(config.max_segment_bytes(), Some(5 * 1024 * 1024 * 1024));
        assert_eq!(config.read_chunk_size(), 1024 * 1024);
    }

    #[test]
    fn rejects_zero_sizes() {
        assert!(SplitConfig::new(Some(0), 1).is_err());
        assert!(SplitConfig::new(Some(1), 0).is_err());
        assert!(SplitConfig::new(None, 1).is_ok());
    }

    #[test]
    fn limit_is_inclusive() {
        let config = SplitConfig::new(Some(10), 4).unwrap();
        assert!(!config.limit_reached(9));
        assert!(config.limit_reached(10));
        assert!(config.limit_reached(12));
        assert!(!SplitConfig::unbounded().limit_reached(u64::MAX));
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size("1048576").unwrap(), MIB);
        assert_eq!(parse_size("512K").unwrap(), 512 * KIB);
        assert_eq!(parse_size("5GiB").unwrap(), 5 * GIB);
        assert_eq!(parse_size("5 gb").unwrap(), 5 * GIB);
        assert_eq!(parse_size("1.5M").unwrap(), MIB + MIB / 2);
        assert_eq!(parse_size("2T").unwrap(), 2 * TIB);
    }

    #[test]
    fn bad_sizes() {
        for text in ["", "0", "0G", "12Q", "G", "1.2.3M", "99999999999T"] {
            assert!(parse_size(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn long_fractions_are_a_precision_error() {
        assert_eq!(parse_size("1.999999T").unwrap(), TIB + 999_999 * TIB / 1_000_000);

        let err = parse_size("1.9999999999999999999G").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidConfig(msg) if msg.contains("decimal places")),
            "{err:?}"
        );
    }
}
