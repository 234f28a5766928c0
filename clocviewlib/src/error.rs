//! Error types for clocviewlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the counter and ingesting its report
#[derive(Error, Debug)]
pub enum ClocViewError {
    /// No usable directory to count
    #[error("no target directory: {0}")]
    NoTargetDirectory(PathBuf),

    /// The counter executable could not be launched
    #[error("failed to start '{program}': {source}")]
    ProcessStart {
        program: String,
        source: std::io::Error,
    },

    /// The counter exited but its output held no parseable trailing JSON object
    #[error("malformed counter output: {message}")]
    MalformedOutput {
        message: String,
        /// Raw captured stdout, kept for diagnostic display
        raw: String,
    },
}
