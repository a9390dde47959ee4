//! SQLite persistence for the quire library.
//!
//! This crate owns the durable state: five tables (books, highlights,
//! vocabulary, tags, book_tags) behind a pooled SQLite connection with
//! foreign-key cascades and embedded forward-only migrations.
//!
//! # Architecture
//! - [`Database`] manages the pool, PRAGMAs, migrations, and the
//!   post-commit change hub.
//! - One repository per entity family translates rows to the domain values
//!   from `quire-model` and back; repositories are the only code that
//!   issues raw store operations.
//! - Reads come in two shapes: one-shot (`list_*`, `get`, `search`) and
//!   reactive (`watch_*`), the latter pushing a fresh snapshot after every
//!   committed mutation in the query's change domain.

mod db;
pub mod error;
mod models;
mod notify;
pub mod repo;

pub use crate::db::Database;
pub use crate::repo::{BookRepository, HighlightRepository, TagRepository, VocabularyRepository};
