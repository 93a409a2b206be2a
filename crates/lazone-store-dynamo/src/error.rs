//! Error type for `lazone-store-dynamo`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("dynamodb error: {0}")]
  Dynamo(#[from] aws_sdk_dynamodb::Error),

  /// The table returned an attribute type this crate does not model.
  #[error("unsupported attribute value: {0}")]
  UnsupportedAttribute(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
