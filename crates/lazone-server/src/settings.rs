//! Runtime configuration, read from `lazone.toml` and `LAZONE_*` variables.
//!
//! ```toml
//! host      = "0.0.0.0"
//! port      = 8080
//! max_items = 128
//!
//! [backend]
//! kind  = "dynamodb"
//! table = "lazone"
//!
//! [newsapi]
//! api_key = "..."
//! ```
//!
//! Nested keys are reachable from the environment with `__`, e.g.
//! `LAZONE_BACKEND__TABLE=lazone-staging`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lazone_core::{MAX_ITEMS, article::ARTICLE_ID};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_host")]
  pub host:      String,
  #[serde(default = "default_port")]
  pub port:      u16,
  #[serde(default = "default_max_items")]
  pub max_items: usize,
  #[serde(default)]
  pub backend:   Backend,
  /// Only required by `ingest`.
  pub newsapi:   Option<NewsApiConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
  Sqlite {
    #[serde(default = "default_sqlite_path")]
    path:          PathBuf,
    #[serde(default = "default_key_attribute")]
    key_attribute: String,
  },
  Dynamodb {
    #[serde(default = "default_table")]
    table: String,
  },
}

impl Default for Backend {
  fn default() -> Self {
    Self::Sqlite {
      path:          default_sqlite_path(),
      key_attribute: default_key_attribute(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiConfig {
  pub api_key:     String,
  #[serde(default = "default_newsapi_url")]
  pub base_url:    String,
  #[serde(default = "default_newsapi_query")]
  pub query:       String,
  #[serde(default = "default_newsapi_language")]
  pub language:    String,
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_max_items() -> usize { MAX_ITEMS }
fn default_sqlite_path() -> PathBuf { PathBuf::from("lazone.db") }
fn default_key_attribute() -> String { ARTICLE_ID.to_owned() }
fn default_table() -> String { "lazone".to_owned() }
fn default_newsapi_url() -> String { "https://newsapi.org/v2".to_owned() }
fn default_newsapi_query() -> String { "climate change".to_owned() }
fn default_newsapi_language() -> String { "en".to_owned() }
fn default_max_retries() -> u32 { 3 }

impl Settings {
  /// Layer the optional TOML file at `path` under `LAZONE_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("LAZONE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> Settings {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let s = parse("");
    assert_eq!(s.port, 8080);
    assert_eq!(s.max_items, 128);
    assert_eq!(s.backend, Backend::default());
    assert!(s.newsapi.is_none());
  }

  #[test]
  fn dynamodb_backend() {
    let s = parse(
      r#"
      max_items = 64
      [backend]
      kind  = "dynamodb"
      table = "lazone-staging"
      "#,
    );
    assert_eq!(s.max_items, 64);
    assert_eq!(s.backend, Backend::Dynamodb { table: "lazone-staging".into() });
  }

  #[test]
  fn newsapi_defaults() {
    let s = parse(
      r#"
      [newsapi]
      api_key = "k"
      "#,
    );
    let n = s.newsapi.unwrap();
    assert_eq!(n.base_url, "https://newsapi.org/v2");
    assert_eq!(n.query, "climate change");
    assert_eq!(n.language, "en");
    assert_eq!(n.max_retries, 3);
  }

  #[test]
  fn tilde_expansion_leaves_plain_paths() {
    assert_eq!(expand_tilde(Path::new("data/lazone.db")), PathBuf::from("data/lazone.db"));
  }
}
