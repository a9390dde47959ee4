use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::UtcDateTime;

/// Document format of a library entry.
///
/// Detection precedence is MIME type first, file-extension fallback second
/// (see [`BookFormat::detect`]). Anything unsupported collapses to
/// [`Unknown`](Self::Unknown), which the import workflow rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookFormat {
    Pdf,
    Epub,
    Txt,
    Html,
    Unknown,
}

impl BookFormat {
    /// Stored/display string for the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookFormat::Pdf => "PDF",
            BookFormat::Epub => "EPUB",
            BookFormat::Txt => "TXT",
            BookFormat::Html => "HTML",
            BookFormat::Unknown => "UNKNOWN",
        }
    }

    /// Detect the format from a file extension (without the leading dot).
    pub fn from_extension(extension: impl AsRef<str>) -> Self {
        match extension.as_ref().trim().to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "epub" => Self::Epub,
            "txt" => Self::Txt,
            "html" | "htm" => Self::Html,
            _ => Self::Unknown,
        }
    }

    /// Detect the format from a MIME type.
    pub fn from_mime_type(mime: impl AsRef<str>) -> Self {
        match mime.as_ref().trim().to_lowercase().as_str() {
            "application/pdf" => Self::Pdf,
            "application/epub+zip" => Self::Epub,
            "text/plain" => Self::Txt,
            "text/html" => Self::Html,
            _ => Self::Unknown,
        }
    }

    /// Detect the format of a file, preferring the MIME type reported by the
    /// import source and falling back to the file name's extension.
    pub fn detect(mime: Option<&str>, file_name: impl AsRef<str>) -> Self {
        if let Some(mime) = mime {
            let format = Self::from_mime_type(mime);
            if format != Self::Unknown {
                return format;
            }
        }
        let name = file_name.as_ref();
        match name.rsplit_once('.') {
            Some((_, extension)) => Self::from_extension(extension),
            None => Self::Unknown,
        }
    }
}

impl FromStr for BookFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "PDF" => Self::Pdf,
            "EPUB" => Self::Epub,
            "TXT" => Self::Txt,
            "HTML" => Self::Html,
            "UNKNOWN" => Self::Unknown,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "format",
                value: format!("unknown format: {}", s),
            }),
        })
    }
}

impl Display for BookFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Reading-status bucket for a [`Book`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookCategory {
    #[default]
    New,
    Reading,
    Read,
    Abandoned,
}

impl BookCategory {
    /// Stored/display string for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::New => "NEW",
            BookCategory::Reading => "READING",
            BookCategory::Read => "READ",
            BookCategory::Abandoned => "ABANDONED",
        }
    }
}

impl FromStr for BookCategory {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "NEW" => Self::New,
            "READING" => Self::Reading,
            "READ" => Self::Read,
            "ABANDONED" => Self::Abandoned,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "category",
                value: format!("unknown category: {}", s),
            }),
        })
    }
}

impl Display for BookCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A library entry: a reference to externally-stored content plus the
/// reading state accumulated against it.
///
/// `id` is zero until the store assigns one on insert. `file_path` is an
/// opaque reference owned by the import collaborator; this crate never
/// opens it.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub file_path: String,
    pub cover_path: Option<String>,
    pub format: BookFormat,
    pub category: BookCategory,
    pub last_page_read: u32,
    /// Fraction of the book read, in `[0, 1]`. Recomputed by the caller as
    /// `page / total_pages` whenever either changes.
    pub reading_progress_percent: f32,
    pub scroll_offset: i32,
    pub total_pages: u32,
    pub added_at: UtcDateTime,
    pub updated_at: UtcDateTime,
}

impl Book {
    /// Create a fresh, unread book with store defaults (category NEW, zero
    /// progress, timestamps set to now).
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        file_path: impl Into<String>,
        format: BookFormat,
    ) -> Self {
        let now = UtcDateTime::now();
        Self {
            id: 0,
            title: title.into(),
            author: author.into(),
            file_path: file_path.into(),
            cover_path: None,
            format,
            category: BookCategory::New,
            last_page_read: 0,
            reading_progress_percent: 0.0,
            scroll_offset: 0,
            total_pages: 0,
            added_at: now,
            updated_at: now,
        }
    }

    /// Attach a cover image path.
    pub fn with_cover(mut self, cover_path: impl Into<String>) -> Self {
        self.cover_path = Some(cover_path.into());
        self
    }
}
