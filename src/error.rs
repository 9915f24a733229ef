//! Error types for scans and for the I/O collaborators around them.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a scan can fail. A failed scan produces no result arrays at all.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Fewer than two points: nearest and furthest neighbours are undefined.
    #[error("at least 2 points are required to find neighbours, got {len}")]
    InvalidInput {
        /// number of points supplied
        len: usize,
    },

    /// A thread pool or the per-point lock array could not be allocated.
    #[error("could not allocate {what}: {reason}")]
    ResourceExhaustion {
        /// the resource that could not be allocated
        what: &'static str,
        /// underlying cause, as reported by the allocator or rayon
        reason: String,
    },
}

impl From<rayon::ThreadPoolBuildError> for ScanError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ScanError::ResourceExhaustion {
            what: "thread pool",
            reason: err.to_string(),
        }
    }
}

impl From<std::collections::TryReserveError> for ScanError {
    fn from(err: std::collections::TryReserveError) -> Self {
        ScanError::ResourceExhaustion {
            what: "per-point locks",
            reason: err.to_string(),
        }
    }
}

/// Errors raised while loading points or persisting results.
#[derive(Debug, Error)]
pub enum IoError {
    /// The point file could not be read or parsed.
    #[error("failed to read points from {path}: {source}")]
    Csv {
        /// file being read
        path: PathBuf,
        /// underlying csv error
        #[source]
        source: csv::Error,
    },

    /// An output file or directory could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// file or directory being written
        path: PathBuf,
        /// underlying io error
        #[source]
        source: std::io::Error,
    },
}
