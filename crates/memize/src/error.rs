//! Error types for memize

use std::io;

use thiserror::Error;

/// Result type alias for memize operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the call path.
///
/// Memoized calls never fail on their own account; only loading options and
/// structural self-checks can produce one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading an options file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Options document could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// A cache failed its structural self-check
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
