use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::VocabularyRow;
use crate::notify::{Change, Notifier};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use quire_model::Vocabulary;
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;

/// Repository for managing saved word/definition rows.
///
/// Vocabulary is the one entity family without a cascade: entries keep
/// their book link after the book is gone, because a word lookup is
/// valuable on its own.
#[derive(Debug, Clone)]
pub struct VocabularyRepository {
    pool: SqlitePool,
    notifier: Notifier,
}

impl From<&Database> for VocabularyRepository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), notifier: db.notifier().clone() }
    }
}

impl VocabularyRepository {
    /// Insert a vocabulary entry, returning the store-assigned id. An
    /// existing id is replaced (upsert).
    pub async fn insert(&self, vocabulary: &Vocabulary) -> Result<i64> {
        let row = VocabularyRow::try_from(vocabulary)?;
        let result = sqlx::query(include_str!("../../queries/upsert_vocabulary.sql"))
            .bind(row.id)
            .bind(row.word)
            .bind(row.definition)
            .bind(row.book_id)
            .bind(row.page_number)
            .bind(row.created_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Vocabulary);
        Ok(result.last_insert_rowid())
    }

    /// Delete a vocabulary entry by id.
    pub async fn delete(&self, vocabulary_id: i64) -> Result<()> {
        sqlx::query(include_str!("../../queries/delete_vocabulary.sql"))
            .bind(vocabulary_id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.notifier.publish(Change::Vocabulary);
        Ok(())
    }

    /// Fetch a vocabulary entry by id. Absence is a normal result, not an error.
    pub async fn get(&self, vocabulary_id: i64) -> Result<Option<Vocabulary>> {
        let row: Option<VocabularyRow> = sqlx::query_as(include_str!("../../queries/get_vocabulary.sql"))
            .bind(vocabulary_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Vocabulary::try_from).transpose()
    }

    /// All saved words, most recent first.
    pub async fn list_all(&self) -> Result<Vec<Vocabulary>> {
        let rows: Vec<VocabularyRow> = sqlx::query_as(include_str!("../../queries/list_vocabulary.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Vocabulary::try_from).collect()
    }

    /// Case-insensitive substring search over word OR definition.
    pub async fn search(&self, query: &str) -> Result<Vec<Vocabulary>> {
        let rows: Vec<VocabularyRow> = sqlx::query_as(include_str!("../../queries/search_vocabulary.sql"))
            .bind(query)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Vocabulary::try_from).collect()
    }

    /// Live snapshots of all saved words.
    pub fn watch_all(&self) -> impl Stream<Item = Result<Vec<Vocabulary>>> + Send + 'static {
        let repo = self.clone();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.list_all().await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_vocabulary() => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.list_all().await;
            }
        })
    }

    /// Live snapshots of a word/definition substring search.
    pub fn watch_search(&self, query: impl Into<String>) -> impl Stream<Item = Result<Vec<Vocabulary>>> + Send + 'static {
        let repo = self.clone();
        let query = query.into();
        let mut rx = self.notifier.subscribe();
        stream!({
            yield repo.search(&query).await;
            loop {
                match rx.recv().await {
                    Ok(change) if change.affects_vocabulary() => {},
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => break,
                }
                yield repo.search(&query).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_search_delete() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = VocabularyRepository::from(&db);

        let id = repo
            .insert(&Vocabulary::new("blusterous", "[adjective]\n1. blowing in loud gusts", None, 12))
            .await
            .unwrap();
        assert!(id > 0);
        repo.insert(&Vocabulary::new("heffalump", "[noun]\n1. an imagined elephant", None, 30))
            .await
            .unwrap();

        // Word match and definition match, case-insensitively.
        assert_eq!(repo.search("BLUSTER").await.unwrap().len(), 1);
        assert_eq!(repo.search("elephant").await.unwrap().len(), 1);
        assert!(repo.search("woozle").await.unwrap().is_empty());

        repo.delete(id).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
        db.close().await;
    }
}
