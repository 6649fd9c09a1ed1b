//! Error type returned at the I/O and parsing boundaries of the crate.
//!
//! The formatting and view-state modules never fail: missing attributes are
//! rendered as unknown values and out-of-range rows are ignored. Only reading
//! image bytes and loading scan reports can produce a `ScopeError`.

use thiserror::Error;

/// Errors produced while reading media images or loading scan reports.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// Reading from the media image or a report file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The scan report is not valid JSON or does not match the report layout.
    #[error("malformed scan report: {0}")]
    Json(#[from] serde_json::Error),

    /// The scan report parsed but its contents are inconsistent.
    ///
    /// The contained `String` names the offending field or record.
    #[error("invalid scan report: {0}")]
    InvalidScan(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScopeError>;
