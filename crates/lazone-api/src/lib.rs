//! JSON read API for LaZone.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lazone_core::store::ArticleStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility; the same router is served over plain
//! HTTP or behind a Lambda function URL.
//!
//! | Method    | Path        | Notes                                      |
//! |-----------|-------------|--------------------------------------------|
//! | `GET`     | `/articles` | Filtered, bounded article list             |
//! | `OPTIONS` | `/articles` | `200 {}`                                   |
//!
//! `/` is an alias for `/articles`.

pub mod articles;
pub mod error;

use std::{any::Any, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{HeaderValue, Request, header},
  response::{IntoResponse, Response},
  routing::get,
};
use lazone_core::{MAX_ITEMS, store::ArticleStore};
use tower_http::{
  catch_panic::CatchPanicLayer,
  set_header::SetResponseHeaderLayer,
  trace::TraceLayer,
};

pub use error::ApiError;

/// Header used to correlate a request with its log lines.
pub const REQUEST_ID: &str = "x-request-id";

// Every response carries the same permissive CORS headers, preflight or not.
const ALLOW_ORIGIN: &str = "*";
const ALLOW_HEADERS: &str =
  "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
const ALLOW_METHODS: &str = "OPTIONS,GET,POST";

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub max_items: usize,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store, max_items: MAX_ITEMS } }

  pub fn with_max_items(mut self, max_items: usize) -> Self {
    self.max_items = max_items;
    self
  }
}

// Not derived: `S` itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      max_items: self.max_items,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ArticleStore + 'static,
{
  Router::new()
    .route("/", get(articles::list::<S>).options(articles::preflight))
    .route("/articles", get(articles::list::<S>).options(articles::preflight))
    .with_state(state)
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_ORIGIN,
      HeaderValue::from_static(ALLOW_ORIGIN),
    ))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_HEADERS,
      HeaderValue::from_static(ALLOW_HEADERS),
    ))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_METHODS,
      HeaderValue::from_static(ALLOW_METHODS),
    ))
    .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
}

/// A panic in a handler or store surfaces as the generic internal error.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
  let message = payload
    .downcast_ref::<&str>()
    .map(|s| (*s).to_owned())
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "handler panicked".to_owned());
  ApiError::Query(lazone_core::Error::Internal(message)).into_response()
}

/// One span per request, keyed by the caller's `x-request-id` or a fresh
/// UUID.
fn request_span<B>(req: &Request<B>) -> tracing::Span {
  let request_id = req
    .headers()
    .get(REQUEST_ID)
    .and_then(|v: &HeaderValue| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

  tracing::info_span!(
    "request",
    method = %req.method(),
    uri = %req.uri(),
    request_id = %request_id,
  )
}
