//! Use-case layer and composition root for the quire ebook library.
//!
//! [`Library`] owns the database, the repositories, and the dictionary
//! client, and exposes the application's workflows as methods so callers
//! (a UI shell, a CLI) never touch a repository directly. The reactive
//! reads from the store crate pass straight through: every `watch_*`
//! method returns a stream of full snapshots that re-emits after each
//! relevant write.
//!
//! # Architecture
//!
//! * [`config`](Config) — layered figment configuration.
//! * [`import`] — file-to-book import workflow with per-item reporting.
//! * [`lookup`] — dictionary lookup plus vocabulary capture, two-phase.
//! * [`progress`](ProgressTracker) — ordered fire-and-forget persistence
//!   of reading positions.
//! * [`search`](LiveSearch) — debounced, subscriber-counted live queries
//!   over books and vocabulary.

mod config;
pub mod error;
pub mod import;
pub mod lookup;
mod progress;
mod search;

pub use crate::config::{Config, SearchConfig};
pub use crate::import::{ImportReport, ImportRequest};
pub use crate::progress::{ProgressTracker, progress_percent};
pub use crate::search::{LiveSearch, SearchSource};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::Stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use quire_dictionary::{Dictionary, HttpDictionary};
use quire_model::{Book, BookCategory, Highlight, Tag, Vocabulary};
use quire_store::{
    BookRepository, Database, HighlightRepository, TagRepository, VocabularyRepository,
};
use std::sync::Arc;
use tracing::warn;

/// Snapshot streams surfaced by the `watch_*` methods. Items carry the
/// store's own result type: a failed re-query yields an `Err` snapshot
/// without ending the stream.
pub type WatchStream<T> = BoxStream<'static, quire_store::error::Result<Vec<T>>>;

/// The composition root: one instance per open library.
///
/// Cheap to share behind an `Arc`; every repository it hands out clones a
/// connection pool handle rather than opening new connections.
pub struct Library {
    db: Database,
    books: BookRepository,
    highlights: HighlightRepository,
    vocabulary: VocabularyRepository,
    tags: TagRepository,
    dictionary: Arc<dyn Dictionary>,
    search: SearchConfig,
}

impl Library {
    /// Open (creating and migrating if necessary) the library described by
    /// `config`, with the HTTP dictionary client.
    pub async fn open(config: &Config) -> Result<Self> {
        let db = Database::connect(&config.database_path)
            .await
            .or_raise(|| ErrorKind::Store)?;
        let dictionary = Arc::new(HttpDictionary::with_base_url(&config.dictionary_base_url));
        Ok(Self::assemble(db, dictionary, config.search.clone()))
    }

    /// Assemble a library over an already-open database and an arbitrary
    /// dictionary implementation. This is the seam tests and embedders use.
    pub fn assemble(db: Database, dictionary: Arc<dyn Dictionary>, search: SearchConfig) -> Self {
        let books = BookRepository::from(&db);
        let highlights = HighlightRepository::from(&db);
        let vocabulary = VocabularyRepository::from(&db);
        let tags = TagRepository::from(&db);
        Self { db, books, highlights, vocabulary, tags, dictionary, search }
    }

    /// Close the underlying connection pool. Outstanding watch streams end
    /// on their next re-query.
    pub async fn close(&self) {
        self.db.close().await;
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub async fn import_book(&self, request: &ImportRequest) -> Result<i64> {
        import::import_book(&self.books, request).await
    }

    pub async fn import_books(&self, requests: &[ImportRequest]) -> ImportReport {
        import::import_books(&self.books, requests).await
    }

    pub async fn book(&self, book_id: i64) -> Result<Option<Book>> {
        self.books.get(book_id).await.or_raise(|| ErrorKind::Store)
    }

    pub async fn update_book(&self, book: &Book) -> Result<()> {
        self.books.update(book).await.or_raise(|| ErrorKind::Store)
    }

    pub async fn set_category(&self, book_id: i64, category: BookCategory) -> Result<()> {
        self.books
            .update_category(book_id, category)
            .await
            .or_raise(|| ErrorKind::Store)
    }

    /// Delete a book: its row (cascading to highlights and tag
    /// associations), then its file and cover from local storage.
    ///
    /// File removal is best-effort — once the row is gone the book is
    /// deleted as far as the caller is concerned, and a leftover file only
    /// costs disk space. Deleting an absent book is a no-op.
    pub async fn delete_book(&self, book_id: i64) -> Result<()> {
        let Some(book) = self.books.get(book_id).await.or_raise(|| ErrorKind::Store)? else {
            return Ok(());
        };
        self.books.delete(book_id).await.or_raise(|| ErrorKind::Store)?;
        remove_file_best_effort(&book.file_path).await;
        if let Some(cover) = &book.cover_path {
            remove_file_best_effort(cover).await;
        }
        Ok(())
    }

    /// Live snapshots of the whole shelf, most recently touched first.
    pub fn watch_books(&self) -> impl Stream<Item = quire_store::error::Result<Vec<Book>>> + Send + 'static {
        self.books.watch_all()
    }

    pub fn watch_books_by_category(
        &self,
        category: BookCategory,
    ) -> impl Stream<Item = quire_store::error::Result<Vec<Book>>> + Send + 'static {
        self.books.watch_category(category)
    }

    /// A fresh search-as-you-type pipeline over the shelf.
    pub fn book_search(&self) -> LiveSearch<BookSearch> {
        LiveSearch::new(
            BookSearch(self.books.clone()),
            self.search.debounce(),
            self.search.linger(),
        )
    }

    /// A tracker that persists reading positions off the hot path.
    pub fn progress_tracker(&self) -> ProgressTracker {
        ProgressTracker::new(self.books.clone())
    }

    // =========================================================================
    // Highlights
    // =========================================================================

    pub async fn add_highlight(&self, highlight: &Highlight) -> Result<i64> {
        self.highlights.insert(highlight).await.or_raise(|| ErrorKind::Store)
    }

    pub async fn remove_highlight(&self, highlight_id: i64, book_id: i64) -> Result<()> {
        self.highlights
            .delete(highlight_id, book_id)
            .await
            .or_raise(|| ErrorKind::Store)
    }

    pub fn watch_highlights(
        &self,
        book_id: i64,
    ) -> impl Stream<Item = quire_store::error::Result<Vec<Highlight>>> + Send + 'static {
        self.highlights.watch_for_book(book_id)
    }

    // =========================================================================
    // Vocabulary
    // =========================================================================

    /// Look `word` up and save it to the vocabulary list, returning the
    /// persisted entry. Nothing is saved unless the lookup succeeds.
    pub async fn lookup_word(
        &self,
        word: &str,
        book_id: Option<i64>,
        page_number: u32,
    ) -> Result<Vocabulary> {
        lookup::lookup_and_save(&*self.dictionary, &self.vocabulary, word, book_id, page_number)
            .await
    }

    pub async fn remove_vocabulary(&self, vocabulary_id: i64) -> Result<()> {
        self.vocabulary.delete(vocabulary_id).await.or_raise(|| ErrorKind::Store)
    }

    pub fn watch_vocabulary(
        &self,
    ) -> impl Stream<Item = quire_store::error::Result<Vec<Vocabulary>>> + Send + 'static {
        self.vocabulary.watch_all()
    }

    /// A fresh search-as-you-type pipeline over saved vocabulary.
    pub fn vocabulary_search(&self) -> LiveSearch<VocabularySearch> {
        LiveSearch::new(
            VocabularySearch(self.vocabulary.clone()),
            self.search.debounce(),
            self.search.linger(),
        )
    }

    // =========================================================================
    // Tags
    // =========================================================================

    pub async fn add_tag(&self, tag: &Tag) -> Result<i64> {
        self.tags.insert(tag).await.or_raise(|| ErrorKind::Store)
    }

    /// Delete a tag everywhere; its book associations go with it.
    pub async fn remove_tag(&self, tag_id: i64) -> Result<()> {
        self.tags.delete(tag_id).await.or_raise(|| ErrorKind::Store)
    }

    pub async fn tag_book(&self, book_id: i64, tag_id: i64) -> Result<()> {
        self.tags.add_to_book(book_id, tag_id).await.or_raise(|| ErrorKind::Store)
    }

    pub async fn untag_book(&self, book_id: i64, tag_id: i64) -> Result<()> {
        self.tags
            .remove_from_book(book_id, tag_id)
            .await
            .or_raise(|| ErrorKind::Store)
    }

    pub fn watch_tags(&self) -> impl Stream<Item = quire_store::error::Result<Vec<Tag>>> + Send + 'static {
        self.tags.watch_all()
    }

    pub fn watch_book_tags(
        &self,
        book_id: i64,
    ) -> impl Stream<Item = quire_store::error::Result<Vec<Tag>>> + Send + 'static {
        self.tags.watch_for_book(book_id)
    }
}

async fn remove_file_best_effort(path: &str) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path, error = %err, "failed to remove file for deleted book");
        }
    }
}

/// [`SearchSource`] over the shelf, matching title or author.
pub struct BookSearch(BookRepository);

impl SearchSource for BookSearch {
    type Item = Book;

    fn all(&self) -> WatchStream<Book> {
        self.0.watch_all().boxed()
    }

    fn search(&self, query: &str) -> WatchStream<Book> {
        self.0.watch_search(query).boxed()
    }
}

/// [`SearchSource`] over saved vocabulary, matching the word.
pub struct VocabularySearch(VocabularyRepository);

impl SearchSource for VocabularySearch {
    type Item = Vocabulary;

    fn all(&self) -> WatchStream<Vocabulary> {
        self.0.watch_all().boxed()
    }

    fn search(&self, query: &str) -> WatchStream<Vocabulary> {
        self.0.watch_search(query).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_dictionary::MockDictionary;
    use quire_model::BookFormat;
    use std::time::Duration;

    async fn library() -> Library {
        library_with(MockDictionary::default()).await
    }

    async fn library_with(dictionary: MockDictionary) -> Library {
        let db = Database::connect_in_memory().await.unwrap();
        Library::assemble(db, Arc::new(dictionary), SearchConfig::default())
    }

    fn epub(name: &str) -> ImportRequest {
        ImportRequest {
            original_name: name.to_string(),
            path: format!("books/{name}"),
            format: BookFormat::Epub,
        }
    }

    #[tokio::test]
    async fn test_import_then_read_flow() {
        let library = library().await;
        let id = library.import_book(&epub("peter_pan.epub")).await.unwrap();

        library.set_category(id, BookCategory::Reading).await.unwrap();
        let tracker = library.progress_tracker();
        tracker.record(id, 12, 120, 640);
        tracker.close().await;

        let book = library.book(id).await.unwrap().unwrap();
        assert_eq!(book.title, "peter pan");
        assert_eq!(book.category, BookCategory::Reading);
        assert_eq!(book.last_page_read, 12);
        assert_eq!(book.scroll_offset, 640);
        library.close().await;
    }

    #[tokio::test]
    async fn test_delete_book_removes_file_and_annotations() {
        let library = library().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pan.epub");
        std::fs::write(&path, b"epub bytes").unwrap();

        let id = library
            .import_book(&ImportRequest {
                original_name: "pan.epub".to_string(),
                path: path.to_str().unwrap().to_string(),
                format: BookFormat::Epub,
            })
            .await
            .unwrap();
        library
            .add_highlight(&Highlight::new(id, "second star to the right", 4))
            .await
            .unwrap();

        library.delete_book(id).await.unwrap();
        assert!(library.book(id).await.unwrap().is_none());
        assert!(!path.exists());
        // Deleting again is a no-op.
        library.delete_book(id).await.unwrap();
        library.close().await;
    }

    #[tokio::test]
    async fn test_lookup_word_saves_vocabulary() {
        let dictionary =
            MockDictionary::with_definitions([("nebulous", "[adjective]\n1. hazy, vague")]);
        let library = library_with(dictionary).await;

        let entry = library.lookup_word("nebulous", None, 7).await.unwrap();
        assert!(entry.id > 0);
        assert_eq!(entry.page_number, 7);
        library.close().await;
    }

    #[tokio::test]
    async fn test_book_search_reacts_to_writes() {
        let library = library().await;
        library.import_book(&epub("peter_pan.epub")).await.unwrap();
        library.import_book(&epub("winnie_the_pooh.epub")).await.unwrap();

        let search = library.book_search();
        let mut results = search.subscribe();
        search.set_query("pooh");
        tokio::time::sleep(SearchConfig::default().debounce() * 2).await;

        let titles: Vec<String> = results.borrow_and_update().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["winnie the pooh"]);

        // A new matching book shows up without touching the query.
        library.import_book(&epub("pooh_returns.epub")).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), results.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(results.borrow().len(), 2);
        library.close().await;
    }
}
