use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::HighlightRow;
use crate::notify::{Change, Notifier};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use quire_model::Highlight;
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;

/// Repository for managing highlight rows.
#[derive(Debug, Clone)]
pub struct HighlightRepository {
    pool: SqlitePool,
    notifier: Notifier,
}

impl From<&Database> for HighlightRepository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), notifier: db.notifier().clone() }
    }
}

impl HighlightRepository {
    /// Insert a highlight, returning the store-assigned id. An existing id
    /// is replaced (upsert).
    pub async fn insert(&self, highlight: &Highlight) -> Result<i64> {
        let row = HighlightRow::try_from(highlight)?;
        let result = sqlx::query(include_str!("../../queries/upsert_highlight.sql"))
            .bind(row.id)
            .bind(row.book_id)
            .bind(row.text)
            .bind(row.note)
            .bind(row.color)
            .bind(row.page_number)
            .bind(row.created_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Highlights { book_id: highlight.book_id });
        Ok(result.last_insert_rowid())
    }

    /// Delete a highlight by id. The book id is only needed to route the
    /// change notification.
    pub async fn delete(&self, highlight_id: i64, book_id: i64) -> Result<()> {
        sqlx::query(include_str!("../../queries/delete_highlight.sql"))
            .bind(highlight_id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Highlights { book_id });
        Ok(())
    }

    /// Fetch a highlight by id. Absence is a normal result, not an error.
    pub async fn get(&self, highlight_id: i64) -> Result<Option<Highlight>> {
        let row: Option<HighlightRow> = sqlx::query_as(include_str!("../../queries/get_highlight.sql"))
            .bind(highlight_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Highlight::try_from).transpose()
    }

    /// All highlights of one book, in page order.
    pub async fn list_for_book(&self, book_id: i64) -> Result<Vec<Highlight>> {
        let rows: Vec<HighlightRow> = sqlx::query_as(include_str!("../../queries/list_highlights_for_book.sql"))
            .bind(book_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Highlight::try_from).collect()
    }

    /// Live snapshots of one book's highlights, refreshed after highlight
    /// mutations for that book and after book deletions (cascade).
    pub fn watch_for_book(&self, book_id: i64) -> impl Stream<Item = Result<Vec<Highlight>>> + Send + 'static {
        let repo = self.clone();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.list_for_book(book_id).await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_highlights_of(book_id) => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.list_for_book(book_id).await;
            }
        })
    }
}
