//! Encoding and decoding helpers between attribute maps and the plain-text
//! columns stored in SQLite.
//!
//! Items are stored as compact JSON in the tagged attribute encoding
//! (`{"S": "..."}`), timestamps as RFC 3339 strings.

use chrono::{DateTime, Utc};
use lazone_core::{
  attr::{AttrValue, Item},
  store::ContinuationToken,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Keys ────────────────────────────────────────────────────────────────────

/// The `(key_type, key_value)` column pair for a key attribute value.
pub fn encode_key(attribute: &str, value: &AttrValue) -> Result<(String, String)> {
  match value {
    AttrValue::S(s) => Ok(("S".to_owned(), s.clone())),
    AttrValue::N(n) => Ok(("N".to_owned(), n.clone())),
    _ => Err(Error::UnsupportedKey(attribute.to_owned())),
  }
}

pub fn decode_key(key_type: &str, key_value: String) -> Result<AttrValue> {
  match key_type {
    "S" => Ok(AttrValue::S(key_value)),
    "N" => Ok(AttrValue::N(key_value)),
    other => Err(Error::CorruptKey(other.to_owned())),
  }
}

/// Pull the key columns out of a full item.
pub fn item_key(attribute: &str, item: &Item) -> Result<(String, String)> {
  let value = item
    .get(attribute)
    .ok_or_else(|| Error::MissingKey(attribute.to_owned()))?;
  encode_key(attribute, value)
}

// ─── Continuation tokens ─────────────────────────────────────────────────────

pub fn encode_token(attribute: &str, key_type: &str, key_value: String) -> Result<ContinuationToken> {
  let mut key = Item::new();
  key.insert(attribute.to_owned(), decode_key(key_type, key_value)?);
  Ok(ContinuationToken(key))
}

pub fn decode_token(attribute: &str, token: &ContinuationToken) -> Result<(String, String)> {
  item_key(attribute, &token.0)
}

// ─── Items ───────────────────────────────────────────────────────────────────

pub fn encode_item(item: &Item) -> Result<String> { Ok(serde_json::to_string(item)?) }

pub fn decode_item(s: &str) -> Result<Item> { Ok(serde_json::from_str(s)?) }

/// Raw strings read directly from an `items` row.
pub struct RawItem {
  pub key_type:  String,
  pub key_value: String,
  pub item_json: String,
}

impl RawItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      key_type:  row.get(0)?,
      key_value: row.get(1)?,
      item_json: row.get(2)?,
    })
  }
}
