//! Dictionary lookup service for the quire library.
//!
//! Translates a single word into a formatted, human-readable multi-meaning
//! definition via the free dictionary HTTP API. Lookup outcomes keep a
//! three-way failure split (not-found / offline / other) so the caller can
//! tell the user something useful instead of a generic error.
//!
//! The [`Dictionary`] trait is the seam the vocabulary workflow depends
//! on; [`HttpDictionary`] is the real implementation, and [`MockDictionary`]
//! (behind the `mock` feature) serves tests.

mod client;
pub mod dto;
pub mod error;
mod format;
#[cfg(feature = "mock")]
mod mock;

pub use crate::client::{DEFAULT_BASE_URL, Dictionary, HttpDictionary};
pub use crate::format::{NO_DEFINITION_SENTINEL, format_definition};
#[cfg(feature = "mock")]
pub use crate::mock::MockDictionary;
