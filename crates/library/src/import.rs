//! Book import workflow.
//!
//! The import collaborator (file picker, copy-to-app-storage) hands us a
//! locally durable file plus a detected format; everything after that
//! point lives here: rejecting unsupported formats before any row exists,
//! deriving a presentable title from the file name, and aggregating bulk
//! imports into a per-item report instead of aborting the batch.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use quire_model::{Book, BookFormat};
use quire_store::BookRepository;
use tracing::{debug, warn};

/// What the import collaborator supplies for one file: the original
/// (display) file name, the locally durable copy, and the format it
/// detected (MIME type first, extension fallback — see
/// [`BookFormat::detect`]).
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub original_name: String,
    pub path: String,
    pub format: BookFormat,
}

/// Outcome of a bulk import: every file is attempted, failures are
/// reported per item rather than aborting the batch.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Store-assigned ids of the books that made it in.
    pub imported: Vec<i64>,
    /// (original file name, what went wrong) for each rejected file.
    pub failed: Vec<(String, crate::error::Error)>,
}

impl ImportReport {
    pub fn succeeded(&self) -> usize {
        self.imported.len()
    }

    pub fn failures(&self) -> usize {
        self.failed.len()
    }
}

/// Derive a book title from a file name: extension stripped, word
/// separators softened.
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    stem.replace(['_', '-'], " ").trim().to_string()
}

/// Import a single locally-copied file as a new book.
///
/// A request with [`BookFormat::Unknown`] is rejected before any row is
/// created, and the partially-copied file is removed (best-effort — a
/// leftover file is an annoyance, not a correctness problem).
pub async fn import_book(books: &BookRepository, request: &ImportRequest) -> Result<i64> {
    if request.format == BookFormat::Unknown {
        if let Err(err) = tokio::fs::remove_file(&request.path).await {
            warn!(path = %request.path, error = %err, "failed to remove rejected import");
        }
        exn::bail!(ErrorKind::UnsupportedFormat(request.original_name.clone()));
    }
    let title = title_from_file_name(&request.original_name);
    let book = Book::new(title, "", &request.path, request.format);
    let id = books.insert(&book).await.or_raise(|| ErrorKind::Store)?;
    debug!(id, name = %request.original_name, "imported book");
    Ok(id)
}

/// Import a batch of files, one report entry per file.
pub async fn import_books(books: &BookRepository, requests: &[ImportRequest]) -> ImportReport {
    let mut report = ImportReport::default();
    for request in requests {
        match import_book(books, request).await {
            Ok(id) => report.imported.push(id),
            Err(err) => report.failed.push((request.original_name.clone(), err)),
        }
    }
    report
}
