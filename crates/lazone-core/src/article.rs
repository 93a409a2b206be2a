//! The article record and the attribute names the read path filters on.
//!
//! Records in the store are heterogeneous attribute maps; [`Article`] is the
//! typed shape the ingestion side writes. The read side never assumes it and
//! works on raw [`Item`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attr::{AttrValue, Item};

// ─── Attribute names ─────────────────────────────────────────────────────────

pub const ARTICLE_ID: &str = "articleId";
pub const DATE_TIME: &str = "dateTime";
pub const TITLE: &str = "title";
pub const AUTHOR: &str = "author";
pub const BODY: &str = "body";
pub const DESCRIPTION: &str = "description";
pub const SOURCE: &str = "source";
pub const SOURCE_NAME: &str = "sourceName";
pub const URL: &str = "url";
pub const IMAGE_URL: &str = "urlToImage";
pub const THINK_TANK_REF: &str = "think_tank_ref";
pub const BROAD_CLAIMS: &str = "broadClaims";

/// The fixed timestamp layout, e.g. `2024-03-09T14:05:00Z`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
  at.format(DATE_FORMAT).to_string()
}

// ─── Article ─────────────────────────────────────────────────────────────────

/// A news article as written by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
  /// Store key. Upserts overwrite any record with the same id.
  pub article_id:   String,
  pub published_at: Option<DateTime<Utc>>,
  pub title:        Option<String>,
  pub author:       Option<String>,
  pub body:         Option<String>,
  pub description:  Option<String>,
  /// Source domain, e.g. `theguardian.com`.
  pub source:       Option<String>,
  /// Display name of the outlet, e.g. `The Guardian`.
  pub source_name:  Option<String>,
  pub url:          Option<String>,
  pub image_url:    Option<String>,
}

impl Article {
  pub fn new(article_id: impl Into<String>) -> Self {
    Self {
      article_id:   article_id.into(),
      published_at: None,
      title:        None,
      author:       None,
      body:         None,
      description:  None,
      source:       None,
      source_name:  None,
      url:          None,
      image_url:    None,
    }
  }

  /// Encode as a store record. Absent fields are omitted rather than
  /// written as nulls, so presence filters see them as missing.
  pub fn into_item(self) -> Item {
    let mut item = Item::new();
    item.insert(ARTICLE_ID.to_owned(), AttrValue::S(self.article_id));

    let optional = [
      (DATE_TIME, self.published_at.map(format_timestamp)),
      (TITLE, self.title),
      (AUTHOR, self.author),
      (BODY, self.body),
      (DESCRIPTION, self.description),
      (SOURCE, self.source),
      (SOURCE_NAME, self.source_name),
      (URL, self.url),
      (IMAGE_URL, self.image_url),
    ];
    for (name, value) in optional {
      if let Some(v) = value {
        item.insert(name.to_owned(), AttrValue::S(v));
      }
    }
    item
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn into_item_omits_absent_fields() {
    let mut article = Article::new("abc123");
    article.published_at = Some(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap());
    article.source = Some("abc.net.au".into());

    let item = article.into_item();
    assert_eq!(item.len(), 3);
    assert_eq!(item[ARTICLE_ID], AttrValue::S("abc123".into()));
    assert_eq!(item[DATE_TIME], AttrValue::S("2024-03-09T14:05:00Z".into()));
    assert_eq!(item[SOURCE], AttrValue::S("abc.net.au".into()));
    assert!(!item.contains_key(BODY));
  }
}
