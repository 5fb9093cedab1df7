//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading inputs for a generation run.
///
/// Resolution itself never fails; problems found while resolving are
/// reported as [`crate::Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading an input file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON decoding or encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
