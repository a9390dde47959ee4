//! In-memory dictionary for testing.

use crate::error::{ErrorKind, Result};
use crate::Dictionary;
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory [`Dictionary`] for testing.
///
/// Serves canned definitions from a `HashMap`, or fails every lookup with
/// one forced error kind. Ideal for unit tests that need a dictionary
/// without network dependencies.
///
/// # Examples
///
/// ```
/// use quire_dictionary::{Dictionary, MockDictionary};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dictionary = MockDictionary::with_definitions([
///     ("hello", "[noun]\n1. a greeting"),
/// ]);
/// assert!(dictionary.define("  Hello ").await?.contains("greeting"));
/// assert!(dictionary.define("woozle").await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockDictionary {
    entries: HashMap<String, String>,
    forced_failure: Option<ErrorKind>,
}

impl MockDictionary {
    /// A dictionary pre-populated with word → formatted-definition pairs.
    ///
    /// Words are stored lowercased, matching the normalization every
    /// [`Dictionary`] implementation performs.
    pub fn with_definitions(entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(word, definition)| (word.into().trim().to_lowercase(), definition.into()))
            .collect();
        Self { entries, forced_failure: None }
    }

    /// A dictionary with no connectivity: every lookup fails with
    /// [`ErrorKind::Offline`].
    pub fn offline() -> Self {
        Self { entries: HashMap::new(), forced_failure: Some(ErrorKind::Offline) }
    }

    /// A dictionary where every lookup fails with [`ErrorKind::Lookup`]
    /// and the given diagnostic message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { entries: HashMap::new(), forced_failure: Some(ErrorKind::Lookup(message.into())) }
    }
}

#[async_trait]
impl Dictionary for MockDictionary {
    async fn define(&self, word: &str) -> Result<String> {
        if let Some(kind) = &self.forced_failure {
            exn::bail!(kind.clone());
        }
        let normalized = word.trim().to_lowercase();
        match self.entries.get(&normalized) {
            Some(definition) => Ok(definition.clone()),
            None => exn::bail!(ErrorKind::NotFound(normalized)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_normalized() {
        let mock = MockDictionary::with_definitions([("Hello", "[noun]\n1. a greeting")]);
        let text = mock.define("  HELLO  ").await.unwrap();
        assert_eq!(text, "[noun]\n1. a greeting");
    }

    #[tokio::test]
    async fn test_missing_word_is_not_found() {
        let mock = MockDictionary::with_definitions([("hello", "hi")]);
        let err = mock.define("woozle").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(word) if word == "woozle"));
    }

    #[tokio::test]
    async fn test_forced_offline() {
        let mock = MockDictionary::offline();
        let err = mock.define("hello").await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Offline));
    }
}
