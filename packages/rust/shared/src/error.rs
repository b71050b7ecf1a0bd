//! Error types for reconmap.
//!
//! Library crates use [`ScanError`] via `thiserror`. The CLI wraps this with
//! `color-eyre` for rich diagnostics at the top level.

use std::path::PathBuf;

/// Top-level error type for all reconmap operations.
///
/// Only fatal conditions (see the error-handling design) ever construct one
/// of these; recoverable and silent conditions are logged and skipped
/// without an error value.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error fetching a baseline or probing a path.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Wordlist could not be loaded or synthesized.
    #[error("wordlist error: {message}")]
    Wordlist { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a wordlist error from any displayable message.
    pub fn wordlist(msg: impl Into<String>) -> Self {
        Self::Wordlist {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
