use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::BookRow;
use crate::notify::{Change, Notifier};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use quire_model::{Book, BookCategory};
use sqlx::SqlitePool;
use time::UtcDateTime;
use tokio::sync::broadcast::error::RecvError;

/// Repository for managing book rows.
///
/// Books are the root of the cascade tree: deleting one takes its
/// highlights and tag associations with it (enforced by foreign keys), but
/// never its vocabulary entries.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
    notifier: Notifier,
}

impl From<&Database> for BookRepository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), notifier: db.notifier().clone() }
    }
}

impl BookRepository {
    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a book, returning the store-assigned id.
    ///
    /// Inserting a book whose id already exists replaces the existing row
    /// (upsert); an id of zero means "assign one".
    pub async fn insert(&self, book: &Book) -> Result<i64> {
        let row = BookRow::try_from(book)?;
        let result = sqlx::query(include_str!("../../queries/upsert_book.sql"))
            .bind(row.id)
            .bind(row.title)
            .bind(row.author)
            .bind(row.file_path)
            .bind(row.cover_path)
            .bind(row.format)
            .bind(row.category)
            .bind(row.last_page_read)
            .bind(row.reading_progress_percent)
            .bind(row.scroll_offset)
            .bind(row.total_pages)
            .bind(row.added_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Books);
        Ok(result.last_insert_rowid())
    }

    /// Replace the full row for an existing book.
    ///
    /// `updated_at` never moves backwards, even if the caller passes a stale
    /// value. A missing id is a no-op, not an error.
    pub async fn update(&self, book: &Book) -> Result<()> {
        let row = BookRow::try_from(book)?;
        sqlx::query(include_str!("../../queries/update_book.sql"))
            .bind(row.id)
            .bind(row.title)
            .bind(row.author)
            .bind(row.file_path)
            .bind(row.cover_path)
            .bind(row.format)
            .bind(row.category)
            .bind(row.last_page_read)
            .bind(row.reading_progress_percent)
            .bind(row.scroll_offset)
            .bind(row.total_pages)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Books);
        Ok(())
    }

    /// Update only the reading-position fields and bump `updated_at`.
    ///
    /// This is the hot path, issued on every page turn/scroll; it avoids
    /// replacing the whole row.
    pub async fn update_reading_progress(
        &self,
        book_id: i64,
        last_page_read: u32,
        progress_percent: f32,
        scroll_offset: i32,
    ) -> Result<()> {
        sqlx::query(include_str!("../../queries/update_reading_progress.sql"))
            .bind(book_id)
            .bind(i64::from(last_page_read))
            .bind(f64::from(progress_percent))
            .bind(i64::from(scroll_offset))
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Books);
        Ok(())
    }

    /// Move a book to another reading-status bucket and bump `updated_at`.
    pub async fn update_category(&self, book_id: i64, category: BookCategory) -> Result<()> {
        sqlx::query(include_str!("../../queries/update_category.sql"))
            .bind(book_id)
            .bind(category.as_str())
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Books);
        Ok(())
    }

    /// Delete a book. Highlights and tag associations cascade away with it;
    /// vocabulary entries keep their (now dangling) book link.
    pub async fn delete(&self, book_id: i64) -> Result<()> {
        sqlx::query(include_str!("../../queries/delete_book.sql"))
            .bind(book_id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Books);
        Ok(())
    }

    // =========================================================================
    // Point/one-shot reads
    // =========================================================================

    /// Fetch a book by id. Absence is a normal result, not an error.
    pub async fn get(&self, book_id: i64) -> Result<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(include_str!("../../queries/get_book.sql"))
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Book::try_from).transpose()
    }

    /// All books, most recently touched first.
    pub async fn list_all(&self) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../../queries/list_books.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Book::try_from).collect()
    }

    /// Books in one reading-status bucket, most recently touched first.
    pub async fn list_by_category(&self, category: BookCategory) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../../queries/list_books_by_category.sql"))
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Book::try_from).collect()
    }

    /// Case-insensitive substring search over title OR author.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../../queries/search_books.sql"))
            .bind(query)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Book::try_from).collect()
    }

    // =========================================================================
    // Reactive reads
    // =========================================================================

    /// Live snapshots of all books, refreshed after every book mutation.
    pub fn watch_all(&self) -> impl Stream<Item = Result<Vec<Book>>> + Send + 'static {
        let repo = self.clone();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.list_all().await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_books() => {},
                    Ok(_) => continue,
                    // Missed notifications collapse into one re-query.
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.list_all().await;
            }
        })
    }

    /// Live snapshots of one category bucket.
    pub fn watch_category(&self, category: BookCategory) -> impl Stream<Item = Result<Vec<Book>>> + Send + 'static {
        let repo = self.clone();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.list_by_category(category).await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_books() => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.list_by_category(category).await;
            }
        })
    }

    /// Live snapshots of a title/author substring search.
    pub fn watch_search(&self, query: impl Into<String>) -> impl Stream<Item = Result<Vec<Book>>> + Send + 'static {
        let repo = self.clone();
        let query = query.into();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.search(&query).await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_books() => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.search(&query).await;
            }
        })
    }
}
