use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use quire_model::Vocabulary;
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct VocabularyRow {
    pub(crate) id: i64,
    pub(crate) word: String,
    pub(crate) definition: String,
    pub(crate) book_id: Option<i64>,
    pub(crate) page_number: i64,
    pub(crate) created_at: i64,
}

impl TryFrom<&Vocabulary> for VocabularyRow {
    type Error = Error;
    fn try_from(vocabulary: &Vocabulary) -> Result<Self, Self::Error> {
        Ok(Self {
            id: vocabulary.id,
            word: vocabulary.word.clone(),
            definition: vocabulary.definition.clone(),
            book_id: vocabulary.book_id,
            page_number: i64::from(vocabulary.page_number),
            created_at: vocabulary.created_at.unix_timestamp(),
        })
    }
}

impl TryFrom<VocabularyRow> for Vocabulary {
    type Error = Error;
    fn try_from(row: VocabularyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            word: row.word,
            definition: row.definition,
            book_id: row.book_id,
            page_number: u32::try_from(row.page_number).or_raise(|| ErrorKind::InvalidData("page number"))?,
            created_at: UtcDateTime::from_unix_timestamp(row.created_at)
                .or_raise(|| ErrorKind::InvalidData("creation date"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_without_book() {
        let vocabulary = Vocabulary::new("blusterous", "[adjective]\n1. windy", None, 0);
        let row = VocabularyRow::try_from(&vocabulary).unwrap();
        assert_eq!(row.book_id, None);
        let back = Vocabulary::try_from(row).unwrap();
        assert_eq!(back.word, "blusterous");
        assert_eq!(back.book_id, None);
    }
}
