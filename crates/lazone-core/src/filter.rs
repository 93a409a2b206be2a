//! Predicates over article records.
//!
//! A [`Filter`] is a non-empty conjunction of [`Condition`]s. The condition
//! set is closed: comparison, substring, membership, presence, and an
//! OR-group. Backends either evaluate a filter directly with
//! [`Filter::matches`] or translate it into their native filter language.

use std::fmt;

use crate::attr::{AttrPath, AttrValue, Item};

// ─── Condition ───────────────────────────────────────────────────────────────

/// Inclusive bound direction for [`Condition::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
  /// `attribute >= value`
  AtLeast,
  /// `attribute <= value`
  AtMost,
}

/// A single boolean test over one record attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
  /// Lexicographic string comparison. ISO-8601 UTC timestamps sort
  /// chronologically under this ordering.
  Compare {
    path:  AttrPath,
    op:    Comparison,
    value: String,
  },
  /// Case-sensitive substring test on a string attribute, or membership
  /// test on a string set or list.
  Contains { path: AttrPath, needle: String },
  /// The string attribute equals one of `values`.
  OneOf { path: AttrPath, values: Vec<String> },
  /// The attribute is present (`true`) or absent (`false`). The value is
  /// never inspected.
  Present { path: AttrPath, present: bool },
  /// At least one branch holds.
  AnyOf(Vec<Condition>),
}

impl Condition {
  pub fn matches(&self, item: &Item) -> bool {
    match self {
      Self::Compare { path, op, value } => {
        match path.lookup(item).and_then(AttrValue::as_s) {
          Some(actual) => match op {
            Comparison::AtLeast => actual >= value.as_str(),
            Comparison::AtMost => actual <= value.as_str(),
          },
          None => false,
        }
      }
      Self::Contains { path, needle } => match path.lookup(item) {
        Some(AttrValue::S(s)) => s.contains(needle.as_str()),
        Some(AttrValue::Ss(set)) => set.iter().any(|s| s == needle),
        Some(AttrValue::L(list)) => {
          list.iter().any(|v| v.as_s() == Some(needle.as_str()))
        }
        _ => false,
      },
      Self::OneOf { path, values } => path
        .lookup(item)
        .and_then(AttrValue::as_s)
        .is_some_and(|s| values.iter().any(|v| v == s)),
      Self::Present { path, present } => {
        path.lookup(item).is_some() == *present
      }
      Self::AnyOf(branches) => branches.iter().any(|c| c.matches(item)),
    }
  }
}

impl fmt::Display for Condition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Compare { path, op, value } => {
        let sym = match op {
          Comparison::AtLeast => ">=",
          Comparison::AtMost => "<=",
        };
        write!(f, "{path} {sym} {value:?}")
      }
      Self::Contains { path, needle } => write!(f, "contains({path}, {needle:?})"),
      Self::OneOf { path, values } => write!(f, "{path} IN {values:?}"),
      Self::Present { path, present: true } => write!(f, "exists({path})"),
      Self::Present { path, present: false } => write!(f, "not_exists({path})"),
      Self::AnyOf(branches) => {
        f.write_str("(")?;
        for (i, b) in branches.iter().enumerate() {
          if i > 0 {
            f.write_str(" OR ")?;
          }
          write!(f, "{b}")?;
        }
        f.write_str(")")
      }
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// A conjunction of one or more conditions. Only [`FilterBuilder::build`]
/// constructs one, so it is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
  conditions: Vec<Condition>,
}

impl Filter {
  pub fn conditions(&self) -> &[Condition] { &self.conditions }

  pub fn matches(&self, item: &Item) -> bool {
    self.conditions.iter().all(|c| c.matches(item))
  }
}

impl fmt::Display for Filter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, c) in self.conditions.iter().enumerate() {
      if i > 0 {
        f.write_str(" AND ")?;
      }
      write!(f, "{c}")?;
    }
    Ok(())
  }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Accumulates active conditions; yields `None` when nothing was added.
#[derive(Debug, Default)]
pub struct FilterBuilder {
  conditions: Vec<Condition>,
}

impl FilterBuilder {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, condition: Condition) { self.conditions.push(condition); }

  /// Add an OR-group. A single branch is added as-is; an empty group adds
  /// nothing.
  pub fn push_any(&mut self, mut branches: Vec<Condition>) {
    match branches.len() {
      0 => {}
      1 => self.conditions.extend(branches.pop()),
      _ => self.conditions.push(Condition::AnyOf(branches)),
    }
  }

  pub fn build(self) -> Option<Filter> {
    if self.conditions.is_empty() {
      None
    } else {
      Some(Filter { conditions: self.conditions })
    }
  }
}
