//! The `ArticleStore` trait and its scan request/response types.
//!
//! The trait is implemented by storage backends (`lazone-store-sqlite`,
//! `lazone-store-dynamo`). The query engine and the HTTP layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{attr::Item, filter::Filter};

// ─── Scan types ──────────────────────────────────────────────────────────────

/// Opaque resume point returned by a scan. Backends encode the last
/// evaluated key in it; callers only hand it back.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken(pub Item);

/// One scan call.
#[derive(Debug, Clone)]
pub struct ScanRequest<'a> {
  /// Applied by the backend after `limit` records have been read, so a page
  /// may hold fewer than `limit` records even when more data follows.
  pub filter: Option<&'a Filter>,
  /// Resume after this point; `None` starts from the beginning.
  pub start:  Option<ContinuationToken>,
  /// Maximum number of records to evaluate.
  pub limit:  usize,
}

/// The outcome of one scan call.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
  pub items: Vec<Item>,
  /// `Some` when the backend may have more records past this page.
  pub next:  Option<ContinuationToken>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the schemaless mapping store holding article records.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ArticleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read one page of records in the backend's stable key order.
  fn scan<'a>(
    &'a self,
    request: ScanRequest<'a>,
  ) -> impl Future<Output = Result<ScanPage, Self::Error>> + Send + 'a;

  /// Insert or overwrite the record sharing `item`'s key.
  fn put_item(
    &self,
    item: Item,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
