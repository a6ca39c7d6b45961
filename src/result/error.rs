//! Error types for clawfetch

use std::time::Duration;
use thiserror::Error;

/// Errors from the PTY session layer.
///
/// Drivers catch these, log them, and fall through to the next strategy;
/// they never reach the user directly.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No pattern matched within the deadline.
    #[error("timed out waiting for pattern (after {duration:?})")]
    Timeout {
        /// Duration that was waited before giving up.
        duration: Duration,
    },

    /// The process closed its output before a pattern matched.
    #[error("process output ended before a pattern matched")]
    Eof,

    /// PTY creation or manipulation failed.
    #[error("PTY error: {0}")]
    Pty(String),

    /// The target command could not be spawned.
    #[error("failed to spawn process: {0}")]
    Spawn(String),

    /// A wait pattern was built from an invalid regex.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Reading from or writing to the PTY failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tool-level failures surfaced to the user.
///
/// The first two variants are the designed failure exits: nothing is written
/// to disk when they occur. The rest propagate from the persistence step.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Every applicable driver failed to capture any output.
    #[error("no driver produced any output")]
    NoOutput,

    /// Output was captured but no pattern extracted a percentage from it.
    #[error("captured output did not contain a usage percentage")]
    NoPercentage,

    /// The home directory could not be resolved.
    #[error("could not determine the home directory")]
    NoHomeDir,

    /// Creating the snapshot directory or writing the file failed.
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized.
    #[error("failed to encode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
