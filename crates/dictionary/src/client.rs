use crate::dto::EntryDto;
use crate::error::{ErrorKind, Result};
use crate::format::format_definition;
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;

/// Default public endpoint (no authentication required).
pub const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev";

/// A provider of formatted word definitions.
///
/// The lookup is a stateless round trip: implementations hold no lock
/// across the call and persist nothing. Input normalization (trim,
/// lowercase) is the implementation's job so every caller gets the same
/// cache/lookup key.
#[async_trait]
pub trait Dictionary: Send + Sync {
    /// Look up a word, returning the formatted multi-line definition text.
    async fn define(&self, word: &str) -> Result<String>;
}

/// Dictionary backed by the free dictionary HTTP API.
///
/// One `GET {base}/api/v2/entries/en/{word}` per lookup. HTTP 404 maps to
/// [`ErrorKind::NotFound`], transport-level failures to
/// [`ErrorKind::Offline`], anything else to [`ErrorKind::Lookup`].
#[derive(Debug, Clone)]
pub struct HttpDictionary {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDictionary {
    /// Client against the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom endpoint (tests point this at a local server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: reqwest::Client::new(), base_url }
    }
}

impl Default for HttpDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dictionary for HttpDictionary {
    #[instrument(skip(self))]
    async fn define(&self, word: &str) -> Result<String> {
        let normalized = word.trim().to_lowercase();
        let url = format!("{}/api/v2/entries/en/{}", self.base_url, normalized);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) if err.is_connect() || err.is_timeout() => {
                exn::bail!(ErrorKind::Offline);
            },
            Err(err) => {
                let message = err.to_string();
                return Err(err).or_raise(|| ErrorKind::Lookup(message));
            },
        };
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            exn::bail!(ErrorKind::NotFound(normalized));
        }
        if !status.is_success() {
            exn::bail!(ErrorKind::Lookup(format!("unexpected status {status} from {url}")));
        }
        let entries: Vec<EntryDto> = response
            .json()
            .await
            .or_raise(|| ErrorKind::Lookup("malformed dictionary response".to_string()))?;
        Ok(format_definition(&entries))
    }
}
