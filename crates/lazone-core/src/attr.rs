//! Typed attribute values, the storage model for article records.
//!
//! A record is a schemaless map from attribute name to [`AttrValue`]. The
//! variants mirror the managed key-value store's wire types so every backend
//! converts to and from them without loss.

use std::{collections::BTreeMap, fmt};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A stored record: attribute name to value.
pub type Item = BTreeMap<String, AttrValue>;

// ─── AttrValue ───────────────────────────────────────────────────────────────

/// A single typed attribute value.
///
/// Numbers are kept as their decimal string form (`N`), exactly as the store
/// returns them; conversion to a JSON number only happens on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
  #[serde(rename = "S")]
  S(String),
  #[serde(rename = "N")]
  N(String),
  #[serde(rename = "B")]
  B(Vec<u8>),
  #[serde(rename = "BOOL")]
  Bool(bool),
  #[serde(rename = "NULL")]
  Null(bool),
  #[serde(rename = "M")]
  M(BTreeMap<String, AttrValue>),
  #[serde(rename = "L")]
  L(Vec<AttrValue>),
  #[serde(rename = "SS")]
  Ss(Vec<String>),
  #[serde(rename = "NS")]
  Ns(Vec<String>),
}

impl AttrValue {
  pub fn as_s(&self) -> Option<&str> {
    match self {
      Self::S(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_m(&self) -> Option<&BTreeMap<String, AttrValue>> {
    match self {
      Self::M(m) => Some(m),
      _ => None,
    }
  }

  /// Render as plain JSON for API responses.
  ///
  /// `N` and `NS` become floating-point numbers, `B` becomes base64, sets
  /// become arrays.
  pub fn to_json(&self) -> Value {
    match self {
      Self::S(s) => Value::String(s.clone()),
      Self::N(n) => number_to_json(n),
      Self::B(bytes) => Value::String(B64.encode(bytes)),
      Self::Bool(b) => Value::Bool(*b),
      Self::Null(_) => Value::Null,
      Self::M(m) => Value::Object(
        m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
      ),
      Self::L(l) => Value::Array(l.iter().map(Self::to_json).collect()),
      Self::Ss(ss) => {
        Value::Array(ss.iter().cloned().map(Value::String).collect())
      }
      Self::Ns(ns) => Value::Array(ns.iter().map(|n| number_to_json(n)).collect()),
    }
  }

  /// Build an attribute value from plain JSON, as received from an upstream
  /// news API. Arrays become lists and objects become maps; no sets are
  /// inferred.
  pub fn from_json(value: &Value) -> Self {
    match value {
      Value::Null => Self::Null(true),
      Value::Bool(b) => Self::Bool(*b),
      Value::Number(n) => Self::N(n.to_string()),
      Value::String(s) => Self::S(s.clone()),
      Value::Array(a) => Self::L(a.iter().map(Self::from_json).collect()),
      Value::Object(o) => Self::M(
        o.iter()
          .map(|(k, v)| (k.clone(), Self::from_json(v)))
          .collect(),
      ),
    }
  }
}

/// Decimal strings that do not fit an `f64` (or are not finite) are passed
/// through as strings rather than dropped.
fn number_to_json(n: &str) -> Value {
  n.trim()
    .parse::<f64>()
    .ok()
    .and_then(Number::from_f64)
    .map(Value::Number)
    .unwrap_or_else(|| Value::String(n.to_owned()))
}

/// Render a whole record as a JSON object.
pub fn item_to_json(item: &Item) -> Value {
  let map: Map<String, Value> =
    item.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
  Value::Object(map)
}

// ─── AttrPath ────────────────────────────────────────────────────────────────

/// A path to a possibly nested attribute, e.g. `broadClaims` → `warming`.
///
/// Segments are kept separate so a segment containing `.` is never
/// mis-split.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrPath(Vec<String>);

impl AttrPath {
  /// A top-level attribute.
  pub fn new(name: impl Into<String>) -> Self { Self(vec![name.into()]) }

  /// Descend into a map attribute.
  pub fn child(mut self, name: impl Into<String>) -> Self {
    self.0.push(name.into());
    self
  }

  pub fn segments(&self) -> &[String] { &self.0 }

  /// Resolve the path against `item`. Intermediate segments must be maps.
  pub fn lookup<'a>(&self, item: &'a Item) -> Option<&'a AttrValue> {
    let (first, rest) = self.0.split_first()?;
    let mut current = item.get(first)?;
    for segment in rest {
      current = current.as_m()?.get(segment)?;
    }
    Some(current)
  }
}

impl fmt::Display for AttrPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.join("."))
  }
}
