use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use quire_model::Highlight;
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct HighlightRow {
    pub(crate) id: i64,
    pub(crate) book_id: i64,
    pub(crate) text: String,
    pub(crate) note: String,
    pub(crate) color: i64,
    pub(crate) page_number: i64,
    pub(crate) created_at: i64,
}

impl TryFrom<&Highlight> for HighlightRow {
    type Error = Error;
    fn try_from(highlight: &Highlight) -> Result<Self, Self::Error> {
        Ok(Self {
            id: highlight.id,
            book_id: highlight.book_id,
            text: highlight.text.clone(),
            note: highlight.note.clone(),
            color: i64::from(highlight.color),
            page_number: i64::from(highlight.page_number),
            created_at: highlight.created_at.unix_timestamp(),
        })
    }
}

impl TryFrom<HighlightRow> for Highlight {
    type Error = Error;
    fn try_from(row: HighlightRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            book_id: row.book_id,
            text: row.text,
            note: row.note,
            color: u32::try_from(row.color).or_raise(|| ErrorKind::InvalidData("color"))?,
            page_number: u32::try_from(row.page_number).or_raise(|| ErrorKind::InvalidData("page number"))?,
            created_at: UtcDateTime::from_unix_timestamp(row.created_at)
                .or_raise(|| ErrorKind::InvalidData("creation date"))?,
        })
    }
}
