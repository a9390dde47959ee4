//! Dictionary Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// A dictionary error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for dictionary operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// The three-way split exists so callers can say different things to the
/// user: "word not found" for [`NotFound`](Self::NotFound), "you're
/// offline" for [`Offline`](Self::Offline), and a generic failure
/// otherwise. Don't collapse these into a boolean.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external source has no entry for this word.
    #[display("word not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The network is unreachable.
    #[display("no internet connection")]
    Offline,
    /// Any other lookup fault, with a diagnostic message.
    #[display("dictionary lookup failed: {_0}")]
    Lookup(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A missing word stays missing; connectivity comes back.
        matches!(self, ErrorKind::Offline)
    }
}
