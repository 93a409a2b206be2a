//! Error types for `lazone-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A date parameter did not match `YYYY-MM-DDTHH:MM:SSZ`.
  #[error("invalid date format for {param}: {value:?}")]
  InvalidDate {
    param: &'static str,
    value: String,
  },

  /// The backing store failed a scan or write.
  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Any other fault, e.g. a panic caught at the HTTP layer. Callers see
  /// only a generic message.
  #[error("internal error: {0}")]
  Internal(String),
}

impl Error {
  /// `true` for errors caused by caller input rather than by the system.
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::InvalidDate { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
