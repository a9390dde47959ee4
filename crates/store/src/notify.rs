//! Post-commit change notifications.
//!
//! Every repository mutation publishes a [`Change`] after its write commits.
//! The watch streams in [`repo`](crate::repo) subscribe to this hub and
//! re-run their query whenever a change lands in their domain, which is what
//! makes the read side push-based without any polling.

use tokio::sync::broadcast;

/// Room for a burst of page-turn updates before a slow subscriber lags.
/// A lagged subscriber re-queries once rather than replaying the backlog.
const CHANNEL_CAPACITY: usize = 64;

/// The domain of data touched by a committed mutation.
///
/// Changes are deliberately coarse: a subscriber re-queries a full snapshot
/// anyway, so the only information it needs is "could my query's result
/// have moved".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A book row was inserted, updated, or deleted. Deletions cascade to
    /// highlights and tag associations, so those watchers listen too.
    Books,
    /// A highlight of the given book was inserted, updated, or deleted.
    Highlights { book_id: i64 },
    /// A vocabulary row was inserted, updated, or deleted.
    Vocabulary,
    /// A tag row was inserted, updated, or deleted.
    Tags,
    /// The tag associations of the given book changed.
    BookTags { book_id: i64 },
}

impl Change {
    /// Whether a book-list query (all/category/search) could be affected.
    pub(crate) fn affects_books(&self) -> bool {
        matches!(self, Change::Books)
    }

    /// Whether the highlight list of `book_id` could be affected.
    ///
    /// Book changes are included because deleting a book cascades away its
    /// highlights without a separate highlight mutation.
    pub(crate) fn affects_highlights_of(&self, book_id: i64) -> bool {
        match self {
            Change::Highlights { book_id: changed } => *changed == book_id,
            Change::Books => true,
            _ => false,
        }
    }

    pub(crate) fn affects_vocabulary(&self) -> bool {
        matches!(self, Change::Vocabulary)
    }

    pub(crate) fn affects_tags(&self) -> bool {
        matches!(self, Change::Tags)
    }

    /// Whether the tag list of `book_id` could be affected, either through
    /// the tags themselves, this book's associations, or a cascade.
    pub(crate) fn affects_tags_of(&self, book_id: i64) -> bool {
        match self {
            Change::Tags | Change::Books => true,
            Change::BookTags { book_id: changed } => *changed == book_id,
            _ => false,
        }
    }
}

/// Broadcast hub shared by the [`Database`](crate::Database) and every
/// repository cloned from it.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    tx: broadcast::Sender<Change>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a committed change. No subscribers is not an error; the
    /// write already happened.
    pub(crate) fn publish(&self, change: Change) {
        _ = self.tx.send(change);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_routing() {
        assert!(Change::Books.affects_books());
        assert!(!Change::Vocabulary.affects_books());

        assert!(Change::Highlights { book_id: 3 }.affects_highlights_of(3));
        assert!(!Change::Highlights { book_id: 3 }.affects_highlights_of(4));
        // A deleted book takes its highlights with it.
        assert!(Change::Books.affects_highlights_of(3));

        assert!(Change::BookTags { book_id: 7 }.affects_tags_of(7));
        assert!(!Change::BookTags { book_id: 7 }.affects_tags_of(8));
        assert!(Change::Tags.affects_tags_of(7));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let notifier = Notifier::new();
        notifier.publish(Change::Books);
        let mut rx = notifier.subscribe();
        notifier.publish(Change::Vocabulary);
        assert_eq!(rx.recv().await.unwrap(), Change::Vocabulary);
    }
}
