mod book;
mod highlight;
mod tag;
mod vocabulary;

pub(crate) use self::book::BookRow;
pub(crate) use self::highlight::HighlightRow;
pub(crate) use self::tag::TagRow;
pub(crate) use self::vocabulary::VocabularyRow;
