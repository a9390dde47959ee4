//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};
use quire_dictionary::error::{Error as DictionaryError, ErrorKind as DictionaryErrorKind};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The persistent store failed; the attempted operation did not happen.
    #[display("storage failure")]
    Store,
    /// The dictionary lookup failed. The inner kind keeps the three-way
    /// split (not-found / offline / other) a UI needs.
    #[display("dictionary lookup failed: {_0}")]
    Lookup(DictionaryErrorKind),
    /// Import rejected before any row was created.
    #[display("unsupported format for file: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// Configuration file or environment could not be read.
    #[display("invalid configuration")]
    Config,
}

impl ErrorKind {
    /// Convert a dictionary error into a library error, preserving the
    /// dictionary crate's `Exn` frame (error tree) as a child in its own
    /// error tree.
    #[track_caller]
    pub fn lookup(err: DictionaryError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Lookup(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Lookup(inner) if inner.is_retryable())
    }
}
