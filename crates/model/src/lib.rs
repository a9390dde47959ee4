//! Domain entities for the quire ebook library.
//!
//! Everything in this crate is a plain value type: entities carry no
//! connection handles and no back-references to storage. The store crate
//! owns the rows; these are the copies it hands out and accepts back.
//!
//! The only logic that lives here is parsing and display for the two
//! closed vocabularies ([`BookFormat`] and [`BookCategory`]), because both
//! the store (TEXT columns) and the import collaborator (MIME types and
//! file extensions) need to agree on them.

mod annotation;
mod book;
pub mod error;

pub use self::annotation::{BookTag, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_TAG_COLOR, Highlight, Tag, Vocabulary};
pub use self::book::{Book, BookCategory, BookFormat};
