//! Human-readable byte counts.

use std::fmt;

/// One kibibyte.
pub const ONE_KB: u64 = 1024;
/// One mebibyte.
pub const ONE_MB: u64 = 1024 * ONE_KB;
/// One gibibyte.
pub const ONE_GB: u64 = 1024 * ONE_MB;

/// A byte count displayed as `bytes`, `KB`, `MB` or `GB`.
///
/// A unit is used only when the count is strictly greater than it, so
/// exactly 1024 bytes displays as `1024 bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileSize(pub u64);

impl fmt::Display for FileSize {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        let (unit, suffix) = if bytes > ONE_GB {
            (ONE_GB, "GB")
        } else if bytes > ONE_MB {
            (ONE_MB, "MB")
        } else if bytes > ONE_KB {
            (ONE_KB, "KB")
        } else {
            return write!(f, "{bytes} bytes");
        };
        write!(f, "{:.2} {suffix}", bytes as f64 / unit as f64)
    }
}

impl From<u64> for FileSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}
