//! Application configuration.
//!
//! Layered figment profile: compiled defaults, then `quire.toml` next to
//! the working directory, then `QUIRE_`-prefixed environment variables
//! (`QUIRE_SEARCH__DEBOUNCE_MS=150` style for nested keys).

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for a quire deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the SQLite database lives.
    pub database_path: PathBuf,
    /// Base URL of the dictionary endpoint.
    pub dictionary_base_url: String,
    pub search: SearchConfig,
}

/// Tuning for the search-as-you-type pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period a query must survive before it executes.
    pub debounce_ms: u64,
    /// How long the live stream stays warm after its last subscriber leaves.
    pub linger_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("quire.db"),
            dictionary_base_url: quire_dictionary::DEFAULT_BASE_URL.to_string(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300, linger_ms: 5_000 }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

impl Config {
    /// Load configuration from defaults, `quire.toml`, and the environment.
    pub fn load() -> Result<Self> {
        Self::figment().extract().or_raise(|| ErrorKind::Config)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("quire.toml"))
            .merge(Env::prefixed("QUIRE_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.linger(), Duration::from_secs(5));
        assert_eq!(config.dictionary_base_url, quire_dictionary::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_environment_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("QUIRE_SEARCH__DEBOUNCE_MS", "150");
            jail.set_env("QUIRE_DATABASE_PATH", "library/books.db");
            let config: Config = Config::figment().extract()?;
            assert_eq!(config.search.debounce_ms, 150);
            assert_eq!(config.database_path, PathBuf::from("library/books.db"));
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_is_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "quire.toml",
                r#"
                    dictionary_base_url = "http://localhost:9999"

                    [search]
                    linger_ms = 1000
                "#,
            )?;
            let config: Config = Config::figment().extract()?;
            assert_eq!(config.dictionary_base_url, "http://localhost:9999");
            assert_eq!(config.search.linger_ms, 1000);
            // Untouched keys keep their defaults.
            assert_eq!(config.search.debounce_ms, 300);
            Ok(())
        });
    }
}
