//! One repository per entity family.
//!
//! Repositories are the only components allowed to issue raw store
//! operations. Each one clones the pool and the change hub out of
//! [`Database`](crate::Database), translates rows to domain values, and
//! publishes a [`Change`](crate::notify::Change) after every committed
//! mutation so that the `watch_*` streams push fresh snapshots without
//! polling.
//!
//! # Reactive reads
//!
//! Every `watch_*` method yields an initial snapshot immediately, then a
//! fresh snapshot after each mutation whose change domain could affect the
//! query. A lagged subscriber re-queries once instead of replaying missed
//! notifications; since every snapshot is a full re-query this loses
//! nothing. Snapshots are only queried after a mutation commits, so a
//! subscriber never observes a partially-applied write.

mod book;
mod highlight;
mod tag;
mod vocabulary;

pub use self::book::BookRepository;
pub use self::highlight::HighlightRepository;
pub use self::tag::TagRepository;
pub use self::vocabulary::VocabularyRepository;
