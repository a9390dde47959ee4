use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use quire_model::{Book, BookCategory, BookFormat};
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct BookRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) file_path: String,
    pub(crate) cover_path: Option<String>,
    pub(crate) format: String,
    pub(crate) category: String,
    pub(crate) last_page_read: i64,
    pub(crate) reading_progress_percent: f64,
    pub(crate) scroll_offset: i64,
    pub(crate) total_pages: i64,
    pub(crate) added_at: i64,
    pub(crate) updated_at: i64,
}

impl TryFrom<&Book> for BookRow {
    type Error = Error;
    fn try_from(book: &Book) -> Result<Self, Self::Error> {
        Ok(Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            file_path: book.file_path.clone(),
            cover_path: book.cover_path.clone(),
            format: book.format.to_string(),
            category: book.category.to_string(),
            last_page_read: i64::from(book.last_page_read),
            reading_progress_percent: f64::from(book.reading_progress_percent),
            scroll_offset: i64::from(book.scroll_offset),
            total_pages: i64::from(book.total_pages),
            added_at: book.added_at.unix_timestamp(),
            updated_at: book.updated_at.unix_timestamp(),
        })
    }
}

impl TryFrom<BookRow> for Book {
    type Error = Error;
    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            author: row.author,
            file_path: row.file_path,
            cover_path: row.cover_path,
            format: row.format.parse::<BookFormat>().or_raise(|| ErrorKind::InvalidData("format"))?,
            category: row.category.parse::<BookCategory>().or_raise(|| ErrorKind::InvalidData("category"))?,
            last_page_read: u32::try_from(row.last_page_read).or_raise(|| ErrorKind::InvalidData("last page read"))?,
            reading_progress_percent: row.reading_progress_percent as f32,
            scroll_offset: i32::try_from(row.scroll_offset).or_raise(|| ErrorKind::InvalidData("scroll offset"))?,
            total_pages: u32::try_from(row.total_pages).or_raise(|| ErrorKind::InvalidData("total pages"))?,
            added_at: UtcDateTime::from_unix_timestamp(row.added_at)
                .or_raise(|| ErrorKind::InvalidData("added date"))?,
            updated_at: UtcDateTime::from_unix_timestamp(row.updated_at)
                .or_raise(|| ErrorKind::InvalidData("updated date"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::{BookCategory, BookFormat};

    #[test]
    fn test_row_to_model() {
        let now = UtcDateTime::now();
        let row = BookRow {
            id: 12,
            title: "Winnie the Pooh".to_string(),
            author: "A. A. Milne".to_string(),
            file_path: "books/pooh.epub".to_string(),
            cover_path: None,
            format: "EPUB".to_string(),
            category: "READING".to_string(),
            last_page_read: 50,
            reading_progress_percent: 0.25,
            scroll_offset: 10,
            total_pages: 200,
            added_at: now.unix_timestamp(),
            updated_at: now.unix_timestamp(),
        };
        let book = Book::try_from(row).unwrap();
        assert_eq!(book.format, BookFormat::Epub);
        assert_eq!(book.category, BookCategory::Reading);
        assert_eq!(book.last_page_read, 50);
        // Converting to a Unix timestamp (measured in seconds) inherently strips the nanoseconds component.
        assert_eq!(book.added_at, now.replace_nanosecond(0).unwrap());
    }

    #[test]
    fn test_model_to_row() {
        let book = Book::new("The House at Pooh Corner", "A. A. Milne", "books/corner.pdf", BookFormat::Pdf);
        let row = BookRow::try_from(&book).unwrap();
        assert_eq!(row.format, "PDF");
        assert_eq!(row.category, "NEW");
        assert_eq!(row.id, 0);
    }

    #[test]
    fn test_garbage_category_is_invalid_data() {
        let now = UtcDateTime::now();
        let row = BookRow {
            id: 1,
            title: String::new(),
            author: String::new(),
            file_path: String::new(),
            cover_path: None,
            format: "EPUB".to_string(),
            category: "SHELVED".to_string(),
            last_page_read: 0,
            reading_progress_percent: 0.0,
            scroll_offset: 0,
            total_pages: 0,
            added_at: now.unix_timestamp(),
            updated_at: now.unix_timestamp(),
        };
        let err = Book::try_from(row).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidData("category")));
    }
}
