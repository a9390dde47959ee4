//! Word lookup and vocabulary capture.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use quire_dictionary::Dictionary;
use quire_model::Vocabulary;
use quire_store::VocabularyRepository;
use tracing::debug;

/// Look a word up and, only if a definition came back, persist it as a
/// vocabulary entry.
///
/// The two phases never interleave: a failed lookup (not found, offline,
/// anything else) leaves the store untouched, so the vocabulary list only
/// ever holds words that resolved to a real definition. The returned entry
/// carries its store-assigned id.
pub async fn lookup_and_save(
    dictionary: &dyn Dictionary,
    vocabulary: &VocabularyRepository,
    word: &str,
    book_id: Option<i64>,
    page_number: u32,
) -> Result<Vocabulary> {
    let word = word.trim();
    let definition = dictionary.define(word).await.map_err(ErrorKind::lookup)?;
    let mut entry = Vocabulary::new(word, definition, book_id, page_number);
    entry.id = vocabulary.insert(&entry).await.or_raise(|| ErrorKind::Store)?;
    debug!(id = entry.id, word = %entry.word, "saved vocabulary entry");
    Ok(entry)
}
