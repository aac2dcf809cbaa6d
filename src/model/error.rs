//! Error types for the pdfws application.
//!
//! Errors are split by concern using `thiserror` and compose through `?` and
//! `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`FetchError`] - Listing fetch failures (HTTP status, transport, decode, directory)
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - `std::io::Error` - Terminal input/output failures
//!
//! # Recovery Strategy
//!
//! Inside the event loop nothing is fatal. A `FetchError` is stored in the
//! workspace's listing state and shown to the user until the next fetch
//! attempt; malformed listing records are normalized rather than rejected
//! (see [`crate::model::RecordIssue`]). Only startup failures (config,
//! logging) and the one-shot listing mode end the process with an error.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file exists but could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// The document listing could not be loaded.
    ///
    /// Only surfaces as an `AppError` in one-shot mode; the interactive shell
    /// keeps running and shows the error in the listing state instead.
    #[error("Failed to load listing: {0}")]
    Fetch(#[from] FetchError),

    /// Reading commands or writing output failed.
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered while fetching the document listing.
///
/// Carries `String` reasons instead of the underlying error values so the
/// error can be cloned into workspace state and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The listing endpoint answered with a non-success status.
    #[error("Listing request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request never produced a response (DNS, connection, timeout).
    #[error("Listing request to {url} failed: {reason}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport error message.
        reason: String,
    },

    /// The response body was not a JSON array of records.
    #[error("Listing from {origin} is not valid JSON: {reason}")]
    Decode {
        /// URL or path the body came from.
        origin: String,
        /// JSON parser message.
        reason: String,
    },

    /// The local listing directory could not be read.
    #[error("Failed to read directory {path:?}: {reason}")]
    Directory {
        /// Directory that failed to list.
        path: PathBuf,
        /// I/O error message.
        reason: String,
    },
}
