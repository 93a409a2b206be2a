//! The bounded, paginated read path.
//!
//! [`QueryEngine::query`] validates parameters, builds the filter, then
//! drives the store's scan/continue protocol until either the store runs out
//! of data or `max_items` records have been collected.

use crate::{
  Error, Result,
  attr::Item,
  filter::Filter,
  params::QueryParams,
  store::{ArticleStore, ScanRequest},
};

/// Upper bound on records returned by a single query.
pub const MAX_ITEMS: usize = 128;

/// Runs read queries against a borrowed store. Holds no state between calls.
pub struct QueryEngine<'s, S> {
  store:     &'s S,
  max_items: usize,
}

impl<'s, S: ArticleStore> QueryEngine<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store, max_items: MAX_ITEMS } }

  pub fn with_max_items(mut self, max_items: usize) -> Self {
    self.max_items = max_items;
    self
  }

  /// Translate `params` and fetch at most `max_items` matching records.
  ///
  /// Validation errors are returned before the store is touched.
  pub async fn query(&self, params: &QueryParams) -> Result<Vec<Item>> {
    let filter = params.to_filter()?;
    match &filter {
      Some(f) => tracing::debug!(filter = %f, "scanning with filter"),
      None => tracing::debug!("scanning without filter"),
    }
    self.scan_bounded(filter.as_ref()).await
  }

  /// Scan page after page until the store has nothing more or the cap is
  /// reached. Store errors abort the whole scan; nothing partial is
  /// returned.
  pub async fn scan_bounded(&self, filter: Option<&Filter>) -> Result<Vec<Item>> {
    let mut items: Vec<Item> = Vec::new();
    let mut start = None;
    let mut pages = 0usize;

    while items.len() < self.max_items {
      let request = ScanRequest {
        filter,
        start,
        limit: self.max_items - items.len(),
      };
      let page = self.store.scan(request).await.map_err(|e| {
        tracing::error!(error = %e, "store scan failed");
        Error::Backend(Box::new(e))
      })?;
      pages += 1;
      items.extend(page.items);

      match page.next {
        Some(token) => start = Some(token),
        None => break,
      }
    }

    items.truncate(self.max_items);
    tracing::info!(items = items.len(), pages, "scan complete");
    Ok(items)
  }
}
