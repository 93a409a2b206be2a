//! [`SqliteStore`] is the SQLite implementation of [`ArticleStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use lazone_core::{
  article::ARTICLE_ID,
  attr::Item,
  store::{ArticleStore, ScanPage, ScanRequest},
};

use crate::{
  Result,
  encode::{RawItem, decode_item, decode_token, encode_dt, encode_item, encode_token, item_key},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An article store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:          tokio_rusqlite::Connection,
  key_attribute: Arc<str>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  /// Use `attribute` instead of `articleId` as the record key.
  pub fn with_key_attribute(mut self, attribute: impl Into<String>) -> Self {
    self.key_attribute = Arc::from(attribute.into());
    self
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, key_attribute: Arc::from(ARTICLE_ID) })
  }

  /// Read up to `limit + 1` rows after `after`, in key order. The extra row
  /// only tells the caller whether more data follows.
  async fn read_rows(
    &self,
    after: Option<(String, String)>,
    limit: usize,
  ) -> Result<Vec<RawItem>> {
    let fetch = i64::try_from(limit).unwrap_or(i64::MAX - 1) + 1;

    let rows = self
      .conn
      .call(move |conn| {
        let rows = if let Some((key_type, key_value)) = after {
          let mut stmt = conn.prepare(
            "SELECT key_type, key_value, item_json FROM items
             WHERE (key_type, key_value) > (?1, ?2)
             ORDER BY key_type, key_value
             LIMIT ?3",
          )?;
          stmt
            .query_map(rusqlite::params![key_type, key_value, fetch], RawItem::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT key_type, key_value, item_json FROM items
             ORDER BY key_type, key_value
             LIMIT ?1",
          )?;
          stmt
            .query_map(rusqlite::params![fetch], RawItem::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── ArticleStore impl ───────────────────────────────────────────────────────

impl ArticleStore for SqliteStore {
  type Error = crate::Error;

  async fn scan<'a>(&'a self, request: ScanRequest<'a>) -> Result<ScanPage> {
    let after = request
      .start
      .as_ref()
      .map(|token| decode_token(&self.key_attribute, token))
      .transpose()?;

    let mut rows = self.read_rows(after, request.limit).await?;
    let more = rows.len() > request.limit;
    rows.truncate(request.limit);

    let next = match rows.last() {
      Some(last) if more => Some(encode_token(
        &self.key_attribute,
        &last.key_type,
        last.key_value.clone(),
      )?),
      _ => None,
    };

    let evaluated = rows.len();
    let mut items = Vec::with_capacity(evaluated);
    for row in rows {
      let item = decode_item(&row.item_json)?;
      if request.filter.is_none_or(|f| f.matches(&item)) {
        items.push(item);
      }
    }

    tracing::debug!(evaluated, matched = items.len(), more, "sqlite scan page");
    Ok(ScanPage { items, next })
  }

  async fn put_item(&self, item: Item) -> Result<()> {
    let (key_type, key_value) = item_key(&self.key_attribute, &item)?;
    let item_json = encode_item(&item)?;
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO items (key_type, key_value, item_json, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (key_type, key_value) DO UPDATE SET
             item_json  = excluded.item_json,
             updated_at = excluded.updated_at",
          rusqlite::params![key_type, key_value, item_json, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
