//! Query parameters accepted by the read API and their translation into a
//! [`Filter`].
//!
//! | Parameter      | Condition                                                     |
//! |----------------|---------------------------------------------------------------|
//! | `startDate`    | `dateTime >= value`                                           |
//! | `endDate`      | `dateTime <= value`                                           |
//! | `search`       | `contains(body, value)`                                       |
//! | `sources`      | `source IN (comma-separated list)`                            |
//! | `publisher`    | `source IN (alias expansion)`; only without `sources`         |
//! | `thinkTankRef` | `true` → `think_tank_ref` present, `false` → absent           |
//! | `broadClaims`  | OR of `broadClaims.<id>` presence over the comma-separated ids |
//!
//! Empty values count as absent. Dates are validated here so a bad request
//! never reaches the store.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::{
  Error, Result,
  article::{BODY, BROAD_CLAIMS, DATE_FORMAT, DATE_TIME, SOURCE, THINK_TANK_REF},
  attr::AttrPath,
  filter::{Comparison, Condition, Filter, FilterBuilder},
  publisher,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
  pub search:         Option<String>,
  /// Comma-separated source domains, e.g. `foxnews.com,theguardian.com`.
  pub sources:        Option<String>,
  /// Publisher alias, e.g. `murdoch media`.
  pub publisher:      Option<String>,
  pub think_tank_ref: Option<String>,
  /// Comma-separated claim identifiers.
  pub broad_claims:   Option<String>,
}

impl QueryParams {
  /// Build the conjunction of every active condition, or `None` when no
  /// parameter contributes one.
  pub fn to_filter(&self) -> Result<Option<Filter>> {
    let mut builder = FilterBuilder::new();

    if let Some(start) = non_empty(&self.start_date) {
      builder.push(Condition::Compare {
        path:  AttrPath::new(DATE_TIME),
        op:    Comparison::AtLeast,
        value: canonical_date("startDate", start)?,
      });
    }
    if let Some(end) = non_empty(&self.end_date) {
      builder.push(Condition::Compare {
        path:  AttrPath::new(DATE_TIME),
        op:    Comparison::AtMost,
        value: canonical_date("endDate", end)?,
      });
    }

    if let Some(search) = non_empty(&self.search) {
      builder.push(Condition::Contains {
        path:   AttrPath::new(BODY),
        needle: search.to_owned(),
      });
    }

    // `sources` takes precedence; `publisher` is dropped when both are given.
    if let Some(sources) = non_empty(&self.sources) {
      let list = split_list(sources);
      if !list.is_empty() {
        builder.push(Condition::OneOf {
          path:   AttrPath::new(SOURCE),
          values: list,
        });
      }
    } else if let Some(name) = non_empty(&self.publisher) {
      match publisher::sources_for(name) {
        Some(domains) => builder.push(Condition::OneOf {
          path:   AttrPath::new(SOURCE),
          values: domains.iter().map(|d| (*d).to_owned()).collect(),
        }),
        None => tracing::warn!(publisher = name, "unknown publisher alias; ignoring"),
      }
    }

    match self.think_tank_ref.as_deref() {
      Some("true") => builder.push(Condition::Present {
        path:    AttrPath::new(THINK_TANK_REF),
        present: true,
      }),
      Some("false") => builder.push(Condition::Present {
        path:    AttrPath::new(THINK_TANK_REF),
        present: false,
      }),
      _ => {}
    }

    if let Some(claims) = non_empty(&self.broad_claims) {
      builder.push_any(
        split_list(claims)
          .into_iter()
          .map(|claim| Condition::Present {
            path:    AttrPath::new(BROAD_CLAIMS).child(claim),
            present: true,
          })
          .collect(),
      );
    }

    Ok(builder.build())
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.is_empty())
}

/// Parse `value` and re-render it zero-padded. The parser tolerates
/// one-digit fields and leading spaces, which would not compare correctly
/// against stored timestamps as-is.
fn canonical_date(param: &'static str, value: &str) -> Result<String> {
  NaiveDateTime::parse_from_str(value, DATE_FORMAT)
    .map(|dt| dt.format(DATE_FORMAT).to_string())
    .map_err(|_| Error::InvalidDate { param, value: value.to_owned() })
}

/// Split on commas, trim each entry, and drop empties.
fn split_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params() -> QueryParams { QueryParams::default() }

  #[test]
  fn no_params_means_no_filter() {
    assert!(params().to_filter().unwrap().is_none());
  }

  #[test]
  fn empty_values_are_ignored() {
    let p = QueryParams {
      start_date: Some(String::new()),
      search: Some(String::new()),
      broad_claims: Some(String::new()),
      ..params()
    };
    assert!(p.to_filter().unwrap().is_none());
  }

  #[test]
  fn malformed_dates_are_rejected() {
    for bad in ["2024-13-40", "2024-01-01", "2024-01-01T00:00:00", "2024-02-30T00:00:00Z"] {
      let p = QueryParams { start_date: Some(bad.into()), ..params() };
      let err = p.to_filter().unwrap_err();
      assert!(err.is_validation(), "{bad}: {err}");

      let p = QueryParams { end_date: Some(bad.into()), ..params() };
      assert!(p.to_filter().unwrap_err().is_validation());
    }
  }

  #[test]
  fn date_window_produces_two_comparisons() {
    let p = QueryParams {
      start_date: Some("2024-01-01T00:00:00Z".into()),
      end_date: Some("2024-06-30T23:59:59Z".into()),
      ..params()
    };
    let filter = p.to_filter().unwrap().unwrap();
    assert_eq!(
      filter.to_string(),
      r#"dateTime >= "2024-01-01T00:00:00Z" AND dateTime <= "2024-06-30T23:59:59Z""#
    );
  }

  #[test]
  fn sources_are_trimmed() {
    let p = QueryParams {
      sources: Some(" foxnews.com , theguardian.com,".into()),
      ..params()
    };
    let filter = p.to_filter().unwrap().unwrap();
    assert_eq!(
      filter.conditions(),
      &[Condition::OneOf {
        path:   AttrPath::new("source"),
        values: vec!["foxnews.com".into(), "theguardian.com".into()],
      }]
    );
  }

  #[test]
  fn sources_win_over_publisher() {
    let both = QueryParams {
      sources: Some("foxnews.com".into()),
      publisher: Some("murdoch media".into()),
      ..params()
    };
    let only_sources = QueryParams {
      sources: Some("foxnews.com".into()),
      ..params()
    };
    assert_eq!(both.to_filter().unwrap(), only_sources.to_filter().unwrap());
  }

  #[test]
  fn publisher_expands_to_domains() {
    let p = QueryParams { publisher: Some("murdoch media".into()), ..params() };
    let filter = p.to_filter().unwrap().unwrap();
    match &filter.conditions()[0] {
      Condition::OneOf { values, .. } => {
        assert_eq!(values.len(), 9);
        assert!(values.iter().any(|v| v == "nypost.com"));
      }
      other => panic!("unexpected condition {other}"),
    }
  }

  #[test]
  fn unknown_publisher_soft_fails() {
    let p = QueryParams { publisher: Some("acme press".into()), ..params() };
    assert!(p.to_filter().unwrap().is_none());
  }

  #[test]
  fn think_tank_ref_tristate() {
    let with = |v: &str| QueryParams { think_tank_ref: Some(v.into()), ..params() };
    assert_eq!(
      with("true").to_filter().unwrap().unwrap().to_string(),
      "exists(think_tank_ref)"
    );
    assert_eq!(
      with("false").to_filter().unwrap().unwrap().to_string(),
      "not_exists(think_tank_ref)"
    );
    assert!(with("yes").to_filter().unwrap().is_none());
  }

  #[test]
  fn broad_claims_single_vs_many() {
    let single = QueryParams { broad_claims: Some("warming".into()), ..params() };
    assert_eq!(
      single.to_filter().unwrap().unwrap().to_string(),
      "exists(broadClaims.warming)"
    );

    let many = QueryParams { broad_claims: Some("a, b".into()), ..params() };
    assert_eq!(
      many.to_filter().unwrap().unwrap().to_string(),
      "(exists(broadClaims.a) OR exists(broadClaims.b))"
    );
  }

  #[test]
  fn loose_dates_are_compared_zero_padded() {
    let p = QueryParams {
      start_date: Some(" 2024-06-01T00:00:00Z".into()),
      end_date: Some("2024-6-30T0:00:00Z".into()),
      ..params()
    };
    assert_eq!(
      p.to_filter().unwrap().unwrap().to_string(),
      r#"dateTime >= "2024-06-01T00:00:00Z" AND dateTime <= "2024-06-30T00:00:00Z""#
    );
  }

  #[test]
  fn dotted_claim_id_is_a_single_key() {
    let p = QueryParams { broad_claims: Some("sea.level".into()), ..params() };
    let filter = p.to_filter().unwrap().unwrap();
    match &filter.conditions()[0] {
      Condition::Present { path, present: true } => {
        assert_eq!(path.segments(), ["broadClaims", "sea.level"]);
      }
      other => panic!("unexpected condition {other}"),
    }
  }

  #[test]
  fn deserializes_camel_case_names() {
    let p: QueryParams = serde_json::from_value(serde_json::json!({
      "startDate": "2024-01-01T00:00:00Z",
      "thinkTankRef": "true",
      "broadClaims": "a",
    }))
    .unwrap();
    assert_eq!(p.start_date.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(p.think_tank_ref.as_deref(), Some("true"));
    assert_eq!(p.broad_claims.as_deref(), Some("a"));
  }
}
