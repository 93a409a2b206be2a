//! Render a [`Filter`] as a DynamoDB `FilterExpression`.
//!
//! Attribute names never appear inline: each distinct path segment gets one
//! `#n<i>` placeholder, so reserved words and names containing `.` are safe.
//! Every literal gets its own `:v<i>` placeholder.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use lazone_core::{
  attr::AttrPath,
  filter::{Comparison, Condition, Filter},
};

/// DynamoDB accepts at most this many operands on the right of `IN`.
const MAX_IN_OPERANDS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
  pub expression: String,
  pub names:      HashMap<String, String>,
  pub values:     HashMap<String, AttributeValue>,
}

pub fn render(filter: &Filter) -> FilterExpression {
  let mut r = Renderer::default();
  let expression = filter
    .conditions()
    .iter()
    .map(|c| r.condition(c))
    .collect::<Vec<_>>()
    .join(" AND ");

  FilterExpression {
    expression,
    names: r.names,
    values: r.values,
  }
}

#[derive(Default)]
struct Renderer {
  /// placeholder → attribute name
  names:   HashMap<String, String>,
  /// attribute name → placeholder
  by_name: HashMap<String, String>,
  values:  HashMap<String, AttributeValue>,
}

impl Renderer {
  fn name(&mut self, segment: &str) -> String {
    if let Some(placeholder) = self.by_name.get(segment) {
      return placeholder.clone();
    }
    let placeholder = format!("#n{}", self.by_name.len());
    self.by_name.insert(segment.to_owned(), placeholder.clone());
    self.names.insert(placeholder.clone(), segment.to_owned());
    placeholder
  }

  fn path(&mut self, path: &AttrPath) -> String {
    path
      .segments()
      .iter()
      .map(|s| self.name(s))
      .collect::<Vec<_>>()
      .join(".")
  }

  fn value(&mut self, value: &str) -> String {
    let placeholder = format!(":v{}", self.values.len());
    self
      .values
      .insert(placeholder.clone(), AttributeValue::S(value.to_owned()));
    placeholder
  }

  fn condition(&mut self, condition: &Condition) -> String {
    match condition {
      Condition::Compare { path, op, value } => {
        let path = self.path(path);
        let sym = match op {
          Comparison::AtLeast => ">=",
          Comparison::AtMost => "<=",
        };
        let value = self.value(value);
        format!("{path} {sym} {value}")
      }
      Condition::Contains { path, needle } => {
        let path = self.path(path);
        let needle = self.value(needle);
        format!("contains({path}, {needle})")
      }
      Condition::OneOf { path, values } => {
        let path = self.path(path);
        let groups: Vec<String> = values
          .chunks(MAX_IN_OPERANDS)
          .map(|chunk| {
            let operands: Vec<String> =
              chunk.iter().map(|v| self.value(v)).collect();
            format!("{path} IN ({})", operands.join(", "))
          })
          .collect();
        match groups.len() {
          // An empty membership test matches nothing.
          0 => format!("{path} IN ({})", self.value("")),
          1 => groups.into_iter().next().unwrap_or_default(),
          _ => format!("({})", groups.join(" OR ")),
        }
      }
      Condition::Present { path, present } => {
        let path = self.path(path);
        if *present {
          format!("attribute_exists({path})")
        } else {
          format!("attribute_not_exists({path})")
        }
      }
      Condition::AnyOf(branches) => {
        let parts: Vec<String> =
          branches.iter().map(|b| self.condition(b)).collect();
        format!("({})", parts.join(" OR "))
      }
    }
  }
}
