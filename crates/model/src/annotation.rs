use time::UtcDateTime;

/// Default highlight colour (gold), packed RGBA.
pub const DEFAULT_HIGHLIGHT_COLOR: u32 = 0xFFFF_D700;
/// Default tag colour (purple), packed RGBA.
pub const DEFAULT_TAG_COLOR: u32 = 0xFF62_00EE;

/// A user-marked excerpt of a book's text.
///
/// Highlights never outlive their book: deleting the book cascades to its
/// highlights at the store level.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub id: i64,
    pub book_id: i64,
    pub text: String,
    pub note: String,
    /// Packed RGBA colour the reader surface renders the mark in.
    pub color: u32,
    pub page_number: u32,
    pub created_at: UtcDateTime,
}

impl Highlight {
    /// Create a new highlight with the default colour and an empty note.
    pub fn new(book_id: i64, text: impl Into<String>, page_number: u32) -> Self {
        Self {
            id: 0,
            book_id,
            text: text.into(),
            note: String::new(),
            color: DEFAULT_HIGHLIGHT_COLOR,
            page_number,
            created_at: UtcDateTime::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// A saved word/definition pair.
///
/// The book link is informational only: it is not a foreign key, and a
/// vocabulary entry deliberately survives the deletion of the book it was
/// looked up from.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    pub id: i64,
    pub word: String,
    /// Formatted multi-line definition text (see the dictionary crate).
    pub definition: String,
    pub book_id: Option<i64>,
    pub page_number: u32,
    pub created_at: UtcDateTime,
}

impl Vocabulary {
    pub fn new(
        word: impl Into<String>,
        definition: impl Into<String>,
        book_id: Option<i64>,
        page_number: u32,
    ) -> Self {
        Self {
            id: 0,
            word: word.into(),
            definition: definition.into(),
            book_id,
            page_number,
            created_at: UtcDateTime::now(),
        }
    }
}

/// A user-defined label attachable to any number of books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: u32,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: 0, name: name.into(), color: DEFAULT_TAG_COLOR }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// The (book, tag) association row. Duplicate pairs are a no-op at the
/// store level, so this pair is unique by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookTag {
    pub book_id: i64,
    pub tag_id: i64,
}
