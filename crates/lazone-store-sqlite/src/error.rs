//! Error type for `lazone-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The item has no value for the configured key attribute.
  #[error("item is missing key attribute {0:?}")]
  MissingKey(String),

  /// Keys must be strings or numbers.
  #[error("key attribute {0:?} must be of type S or N")]
  UnsupportedKey(String),

  #[error("unknown key type in database: {0:?}")]
  CorruptKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
