//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const INVALID_DATE_MESSAGE: &str =
  "Invalid date format. Use ISO 8601 format: YYYY-MM-DDTHH:MM:SSZ";
pub const BACKEND_MESSAGE: &str = "Database operation failed";
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The query string itself could not be decoded.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Query(#[from] lazone_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use lazone_core::Error;

    let (status, body) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Query(Error::InvalidDate { param, value }) => {
        tracing::info!(param = %param, value = %value, "rejected date parameter");
        (StatusCode::BAD_REQUEST, json!({ "error": INVALID_DATE_MESSAGE }))
      }
      ApiError::Query(Error::Backend(e)) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": BACKEND_MESSAGE, "details": e.to_string() }),
      ),
      ApiError::Query(e) => {
        // Details stay in the log; the caller gets the generic message.
        tracing::error!(error = %e, "unexpected failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": INTERNAL_MESSAGE }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
