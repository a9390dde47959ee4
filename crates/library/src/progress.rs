//! Reading-progress tracking.
//!
//! The reader surface fires a position event on every page turn and scroll
//! stop, so persisting progress must never block the reading flow. The
//! tracker decouples the two: [`record`](ProgressTracker::record) is
//! synchronous and cheap, and a single worker task applies updates against
//! the store strictly in the order they were issued, which is what keeps
//! per-book ordering without any locking.

use quire_store::BookRepository;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct ProgressUpdate {
    book_id: i64,
    page: u32,
    total_pages: u32,
    scroll_offset: i32,
}

/// Fraction of the book read, clamped to `[0, 1]`. A zero-page book has
/// zero progress rather than a division error.
pub fn progress_percent(page: u32, total_pages: u32) -> f32 {
    if total_pages == 0 {
        return 0.0;
    }
    (page as f32 / total_pages as f32).clamp(0.0, 1.0)
}

/// Fire-and-forget writer for reading positions.
///
/// Updates for the same book are applied in issue order; once recorded,
/// an update runs to completion or failure (there is no cancellation
/// mid-write). A failed write is logged and dropped — the next page turn
/// supersedes it anyway.
#[derive(Debug)]
pub struct ProgressTracker {
    tx: mpsc::UnboundedSender<ProgressUpdate>,
    worker: JoinHandle<()>,
}

impl ProgressTracker {
    pub fn new(books: BookRepository) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ProgressUpdate>();
        let worker = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                let percent = progress_percent(update.page, update.total_pages);
                if let Err(err) = books
                    .update_reading_progress(update.book_id, update.page, percent, update.scroll_offset)
                    .await
                {
                    warn!(book_id = update.book_id, error = %err, "failed to persist reading progress");
                }
            }
        });
        Self { tx, worker }
    }

    /// Record a new reading position. Never blocks the caller.
    pub fn record(&self, book_id: i64, page: u32, total_pages: u32, scroll_offset: i32) {
        // The worker only stops once the tracker is dropped, so a send
        // failure here means shutdown is already underway.
        _ = self.tx.send(ProgressUpdate { book_id, page, total_pages, scroll_offset });
    }

    /// Drain every recorded update, then stop the worker.
    pub async fn close(self) {
        drop(self.tx);
        _ = self.worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::{Book, BookFormat};
    use quire_store::Database;
    use rstest::rstest;

    #[rstest]
    #[case(50, 200, 0.25)]
    #[case(0, 200, 0.0)]
    #[case(200, 200, 1.0)]
    // Callers can momentarily report a page beyond the total (e.g. during
    // a re-pagination); the percent still clamps.
    #[case(300, 200, 1.0)]
    #[case(10, 0, 0.0)]
    fn test_progress_percent(#[case] page: u32, #[case] total: u32, #[case] expected: f32) {
        assert_eq!(progress_percent(page, total), expected);
    }

    #[tokio::test]
    async fn test_updates_apply_in_issue_order() {
        let db = Database::connect_in_memory().await.unwrap();
        let books = BookRepository::from(&db);
        let id = books
            .insert(&Book::new("Pooh", "Milne", "books/pooh.epub", BookFormat::Epub))
            .await
            .unwrap();

        let tracker = ProgressTracker::new(books.clone());
        for page in 1..=20 {
            tracker.record(id, page, 200, 0);
        }
        tracker.close().await;

        // The last issued update wins, not an arbitrary interleaving.
        let book = books.get(id).await.unwrap().unwrap();
        assert_eq!(book.last_page_read, 20);
        assert_eq!(book.reading_progress_percent, progress_percent(20, 200));
        db.close().await;
    }

    #[tokio::test]
    async fn test_record_for_missing_book_is_harmless() {
        let db = Database::connect_in_memory().await.unwrap();
        let tracker = ProgressTracker::new(BookRepository::from(&db));
        tracker.record(999, 10, 100, 0);
        tracker.close().await;
        db.close().await;
    }
}
