//! Handlers for `/articles`.
//!
//! Query params map directly to [`QueryParams`] fields: `startDate`,
//! `endDate`, `search`, `sources`, `publisher`, `thinkTankRef`,
//! `broadClaims`. List-valued params are comma-separated strings.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use lazone_core::{
  QueryEngine,
  attr::item_to_json,
  params::QueryParams,
  store::ArticleStore,
};
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

/// `GET /articles[?startDate=...][&endDate=...][&search=...][&sources=...]...`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ArticleStore,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let items = QueryEngine::new(state.store.as_ref())
    .with_max_items(state.max_items)
    .query(&params)
    .await?;

  Ok(Json(Value::Array(items.iter().map(item_to_json).collect())))
}

/// `OPTIONS /articles`
pub async fn preflight() -> Json<Value> { Json(json!({})) }

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
  };
  use lazone_core::{
    attr::{AttrValue, Item},
    store::{ScanPage, ScanRequest},
  };
  use lazone_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use crate::{
    api_router,
    error::{BACKEND_MESSAGE, INTERNAL_MESSAGE, INVALID_DATE_MESSAGE},
  };

  use super::*;

  fn article(id: &str, date: &str, source: &str, body: &str) -> Item {
    let mut item = Item::new();
    item.insert("articleId".into(), AttrValue::S(id.into()));
    item.insert("dateTime".into(), AttrValue::S(date.into()));
    item.insert("source".into(), AttrValue::S(source.into()));
    item.insert("body".into(), AttrValue::S(body.into()));
    item
  }

  async fn seeded() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let rows = [
      article("a", "2024-01-01T00:00:00Z", "foxnews.com", "bushfire"),
      article("b", "2024-02-01T00:00:00Z", "abc.net.au", "flood"),
      article("c", "2024-03-01T00:00:00Z", "wsj.com", "drought"),
    ];
    for row in rows {
      store.put_item(row).await.unwrap();
    }
    let mut scored = article("d", "2024-04-01T00:00:00Z", "abc.net.au", "heat");
    scored.insert("score".into(), AttrValue::N("3".into()));
    store.put_item(scored).await.unwrap();
    ApiState::new(Arc::new(store))
  }

  async fn send<S: ArticleStore + 'static>(
    state: ApiState<S>,
    method: &str,
    uri: &str,
  ) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::empty())
      .unwrap();
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn ids(body: &Value) -> Vec<&str> {
    body
      .as_array()
      .unwrap()
      .iter()
      .map(|a| a["articleId"].as_str().unwrap())
      .collect()
  }

  // ── GET ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn no_params_returns_everything() {
    let resp = send(seeded().await, "GET", "/articles").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(ids(&body), ["a", "b", "c", "d"]);
    assert_eq!(body[3]["score"], json!(3.0));
  }

  #[tokio::test]
  async fn root_path_is_an_alias() {
    let resp = send(seeded().await, "GET", "/?search=flood").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ids(&json_body(resp).await), ["b"]);
  }

  #[tokio::test]
  async fn date_window_filters() {
    let uri = "/articles?startDate=2024-02-01T00:00:00Z&endDate=2024-03-01T00:00:00Z";
    let body = json_body(send(seeded().await, "GET", uri).await).await;
    assert_eq!(ids(&body), ["b", "c"]);
  }

  #[tokio::test]
  async fn publisher_alias_filters() {
    let uri = "/articles?publisher=murdoch%20media";
    let body = json_body(send(seeded().await, "GET", uri).await).await;
    assert_eq!(ids(&body), ["a", "c"]);
  }

  #[tokio::test]
  async fn sources_list_is_trimmed() {
    let uri = "/articles?sources=abc.net.au%2C%20wsj.com";
    let body = json_body(send(seeded().await, "GET", uri).await).await;
    assert_eq!(ids(&body), ["b", "c", "d"]);
  }

  #[tokio::test]
  async fn cap_is_configurable() {
    let state = seeded().await.with_max_items(2);
    let body = json_body(send(state, "GET", "/articles").await).await;
    assert_eq!(ids(&body), ["a", "b"]);
  }

  #[tokio::test]
  async fn invalid_date_is_400() {
    let resp = send(seeded().await, "GET", "/articles?startDate=2024-01-01").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      json_body(resp).await,
      json!({ "error": INVALID_DATE_MESSAGE })
    );
  }

  #[tokio::test]
  async fn every_response_carries_cors_headers() {
    for uri in ["/articles", "/articles?startDate=bad"] {
      let resp = send(seeded().await, "GET", uri).await;
      let headers = resp.headers();
      assert_eq!(headers["access-control-allow-origin"], "*");
      assert_eq!(headers["access-control-allow-methods"], "OPTIONS,GET,POST");
      assert!(
        headers["access-control-allow-headers"]
          .to_str()
          .unwrap()
          .contains("X-Api-Key")
      );
    }
  }

  // ── OPTIONS ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn options_returns_empty_object() {
    let resp = send(seeded().await, "OPTIONS", "/articles").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({}));
  }

  // ── Failures ──────────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("ProvisionedThroughputExceededException")]
  struct Throttled;

  struct FailingStore;

  impl ArticleStore for FailingStore {
    type Error = Throttled;

    async fn scan<'a>(&'a self, _: ScanRequest<'a>) -> Result<ScanPage, Throttled> {
      Err(Throttled)
    }

    async fn put_item(&self, _: Item) -> Result<(), Throttled> { Err(Throttled) }
  }

  #[tokio::test]
  async fn backend_failure_is_500_with_details() {
    let state = ApiState::new(Arc::new(FailingStore));
    let resp = send(state, "GET", "/articles").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      json_body(resp).await,
      json!({
        "error": BACKEND_MESSAGE,
        "details": "ProvisionedThroughputExceededException",
      })
    );
  }

  #[tokio::test]
  async fn invalid_date_never_reaches_the_store() {
    // A failing store would turn any scan into a 500.
    let state = ApiState::new(Arc::new(FailingStore));
    let resp = send(state, "GET", "/articles?endDate=yesterday").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  struct PanickingStore;

  impl ArticleStore for PanickingStore {
    type Error = Throttled;

    async fn scan<'a>(&'a self, _: ScanRequest<'a>) -> Result<ScanPage, Throttled> {
      panic!("connection pool corrupted")
    }

    async fn put_item(&self, _: Item) -> Result<(), Throttled> { Ok(()) }
  }

  #[tokio::test]
  async fn store_panic_is_generic_500_with_cors() {
    let state = ApiState::new(Arc::new(PanickingStore));
    let resp = send(state, "GET", "/articles").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(json_body(resp).await, json!({ "error": INTERNAL_MESSAGE }));
  }

  #[tokio::test]
  async fn internal_failure_hides_details() {
    let resp = ApiError::Query(lazone_core::Error::Internal("lock poisoned".into()))
      .into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await, json!({ "error": INTERNAL_MESSAGE }));
  }
}
