//! seats_io — local I/O for the seats engine.
//!
//! - Bounded reads of local JSON (no network; any `<scheme>://` path is refused).
//! - Election config, committees, and per-region vote files.
//! - `RegionSource` seam with directory-backed and in-memory sources.
//! - Canonical JSON (sorted keys, compact, atomic file write) and SHA-256 digests.

#![forbid(unsafe_code)]

use seats_core::CoreError;
use thiserror::Error;

/// Unified error for seats_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, read, create_dir_all, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON decode/encode errors; `pointer` names the file or value at fault.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Input exceeded the read cap.
    #[error("input too large: {path} exceeds {limit} bytes")]
    TooLarge { path: String, limit: u64 },

    /// Offline posture: URLs are never fetched.
    #[error("remote paths are not allowed: {0}")]
    Remote(String),

    /// Configuration or data failed a domain check.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<CoreError> for IoError {
    fn from(e: CoreError) -> Self {
        IoError::Invalid(e.to_string())
    }
}

/// True if `s` looks like a URL: any `<scheme>://`, or a bare `http:`,
/// `https:` or `file:` prefix. Drive letters (`C:\...`) are local.
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || ["http:", "https:", "file:"].iter().any(|p| lower.starts_with(p))
}

pub mod canonical_json;
pub mod hasher;
pub mod config;
pub mod loader;
pub mod source;

pub mod prelude {
    pub use crate::{looks_like_url_strict, IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::config::load_config;
    pub use crate::hasher::{result_id, sha256_canonical, sha256_hex};
    pub use crate::loader::{load_committees, Committees};
    pub use crate::source::{DataError, DirSource, MemorySource, RegionSource, RegionVotes};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection_is_strict() {
        assert!(looks_like_url_strict("https://example.org/data"));
        assert!(looks_like_url_strict(" file:///tmp/x.json"));
        assert!(looks_like_url_strict("HTTP:example.org"));
        assert!(looks_like_url_strict("file:relative.json"));
        assert!(!looks_like_url_strict("fixtures/demo/config.json"));
        assert!(!looks_like_url_strict(r"C:\local\file.json"));
    }

    #[test]
    fn core_errors_become_invalid() {
        let e: IoError = CoreError::EmptySeatTable.into();
        assert!(matches!(e, IoError::Invalid(_)));
        assert!(e.to_string().contains("seats_per_region"));
    }
}
