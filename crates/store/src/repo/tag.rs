use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::TagRow;
use crate::notify::{Change, Notifier};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use quire_model::Tag;
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;

/// Repository for managing tags and their many-to-many book associations.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: SqlitePool,
    notifier: Notifier,
}

impl From<&Database> for TagRepository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), notifier: db.notifier().clone() }
    }
}

impl TagRepository {
    // =========================================================================
    // Tags
    // =========================================================================

    /// Insert a tag, returning the store-assigned id. An existing id is
    /// replaced (upsert).
    pub async fn insert(&self, tag: &Tag) -> Result<i64> {
        let row = TagRow::try_from(tag)?;
        let result = sqlx::query(include_str!("../../queries/upsert_tag.sql"))
            .bind(row.id)
            .bind(row.name)
            .bind(row.color)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Tags);
        Ok(result.last_insert_rowid())
    }

    /// Delete a tag. Its book associations cascade away with it.
    pub async fn delete(&self, tag_id: i64) -> Result<()> {
        sqlx::query(include_str!("../../queries/delete_tag.sql"))
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Tags);
        Ok(())
    }

    /// Fetch a tag by id. Absence is a normal result, not an error.
    pub async fn get(&self, tag_id: i64) -> Result<Option<Tag>> {
        let row: Option<TagRow> = sqlx::query_as(include_str!("../../queries/get_tag.sql"))
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Tag::try_from).transpose()
    }

    /// All tags, alphabetically.
    pub async fn list_all(&self) -> Result<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(include_str!("../../queries/list_tags.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Tag::try_from).collect()
    }

    // =========================================================================
    // Associations
    // =========================================================================

    /// Attach a tag to a book. Attaching an already-attached pair is a
    /// no-op, never an error (idempotent).
    pub async fn add_to_book(&self, book_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query(include_str!("../../queries/add_book_tag.sql"))
            .bind(book_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::BookTags { book_id });
        Ok(())
    }

    /// Detach a tag from a book.
    pub async fn remove_from_book(&self, book_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query(include_str!("../../queries/remove_book_tag.sql"))
            .bind(book_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::BookTags { book_id });
        Ok(())
    }

    /// All tags attached to one book, alphabetically.
    pub async fn list_for_book(&self, book_id: i64) -> Result<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(include_str!("../../queries/list_tags_for_book.sql"))
            .bind(book_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Tag::try_from).collect()
    }

    // =========================================================================
    // Reactive reads
    // =========================================================================

    /// Live snapshots of all tags.
    pub fn watch_all(&self) -> impl Stream<Item = Result<Vec<Tag>>> + Send + 'static {
        let repo = self.clone();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.list_all().await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_tags() => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.list_all().await;
            }
        })
    }

    /// Live snapshots of one book's tags, refreshed on tag edits, on this
    /// book's association changes, and on book deletions (cascade).
    pub fn watch_for_book(&self, book_id: i64) -> impl Stream<Item = Result<Vec<Tag>>> + Send + 'static {
        let repo = self.clone();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.list_for_book(book_id).await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_tags_of(book_id) => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.list_for_book(book_id).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::BookRepository;
    use quire_model::{Book, BookFormat};

    async fn book_and_tag(db: &Database) -> (i64, i64) {
        let books = BookRepository::from(db);
        let tags = TagRepository::from(db);
        let book_id = books
            .insert(&Book::new("Pooh", "Milne", "books/pooh.epub", BookFormat::Epub))
            .await
            .unwrap();
        let tag_id = tags.insert(&Tag::new("childhood")).await.unwrap();
        (book_id, tag_id)
    }

    #[tokio::test]
    async fn test_association_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = TagRepository::from(&db);
        let (book_id, tag_id) = book_and_tag(&db).await;

        repo.add_to_book(book_id, tag_id).await.unwrap();
        // Second attach of the same pair is ignored, not an error.
        repo.add_to_book(book_id, tag_id).await.unwrap();

        assert_eq!(repo.list_for_book(book_id).await.unwrap().len(), 1);
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM book_tags")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_remove_association_keeps_both_sides() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = TagRepository::from(&db);
        let books = BookRepository::from(&db);
        let (book_id, tag_id) = book_and_tag(&db).await;

        repo.add_to_book(book_id, tag_id).await.unwrap();
        repo.remove_from_book(book_id, tag_id).await.unwrap();

        assert!(repo.list_for_book(book_id).await.unwrap().is_empty());
        assert!(repo.get(tag_id).await.unwrap().is_some());
        assert!(books.get(book_id).await.unwrap().is_some());
        db.close().await;
    }

    #[tokio::test]
    async fn test_deleting_tag_cascades_association() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = TagRepository::from(&db);
        let (book_id, tag_id) = book_and_tag(&db).await;

        repo.add_to_book(book_id, tag_id).await.unwrap();
        repo.delete(tag_id).await.unwrap();

        assert!(repo.list_for_book(book_id).await.unwrap().is_empty());
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM book_tags")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        db.close().await;
    }
}
