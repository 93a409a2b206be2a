//! Conversion between [`AttrValue`] and the SDK's [`AttributeValue`].

use std::collections::HashMap;

use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use lazone_core::attr::{AttrValue, Item};

use crate::{Error, Result};

pub fn to_attribute_value(value: &AttrValue) -> AttributeValue {
  match value {
    AttrValue::S(s) => AttributeValue::S(s.clone()),
    AttrValue::N(n) => AttributeValue::N(n.clone()),
    AttrValue::B(b) => AttributeValue::B(Blob::new(b.clone())),
    AttrValue::Bool(b) => AttributeValue::Bool(*b),
    AttrValue::Null(n) => AttributeValue::Null(*n),
    AttrValue::M(m) => AttributeValue::M(
      m.iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect(),
    ),
    AttrValue::L(l) => AttributeValue::L(l.iter().map(to_attribute_value).collect()),
    AttrValue::Ss(ss) => AttributeValue::Ss(ss.clone()),
    AttrValue::Ns(ns) => AttributeValue::Ns(ns.clone()),
  }
}

/// Binary sets have no counterpart and come back as lists of binaries.
pub fn from_attribute_value(value: AttributeValue) -> Result<AttrValue> {
  Ok(match value {
    AttributeValue::S(s) => AttrValue::S(s),
    AttributeValue::N(n) => AttrValue::N(n),
    AttributeValue::B(b) => AttrValue::B(b.into_inner()),
    AttributeValue::Bool(b) => AttrValue::Bool(b),
    AttributeValue::Null(n) => AttrValue::Null(n),
    AttributeValue::M(m) => AttrValue::M(from_item_map(m)?),
    AttributeValue::L(l) => AttrValue::L(
      l.into_iter()
        .map(from_attribute_value)
        .collect::<Result<_>>()?,
    ),
    AttributeValue::Ss(ss) => AttrValue::Ss(ss),
    AttributeValue::Ns(ns) => AttrValue::Ns(ns),
    AttributeValue::Bs(bs) => {
      AttrValue::L(bs.into_iter().map(|b| AttrValue::B(b.into_inner())).collect())
    }
    other => return Err(Error::UnsupportedAttribute(format!("{other:?}"))),
  })
}

pub fn to_item_map(item: &Item) -> HashMap<String, AttributeValue> {
  item
    .iter()
    .map(|(k, v)| (k.clone(), to_attribute_value(v)))
    .collect()
}

pub fn from_item_map(map: HashMap<String, AttributeValue>) -> Result<Item> {
  map
    .into_iter()
    .map(|(k, v)| Ok((k, from_attribute_value(v)?)))
    .collect()
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;

  #[test]
  fn nested_values_survive_the_round_trip() {
    let mut claims = BTreeMap::new();
    claims.insert("warming".to_owned(), AttrValue::L(vec![AttrValue::N("1".into())]));

    let mut item = Item::new();
    item.insert("articleId".into(), AttrValue::N("42".into()));
    item.insert("broadClaims".into(), AttrValue::M(claims));
    item.insert("thumb".into(), AttrValue::B(vec![1, 2, 3]));
    item.insert("tags".into(), AttrValue::Ss(vec!["a".into()]));
    item.insert("gone".into(), AttrValue::Null(true));

    let map = to_item_map(&item);
    assert_eq!(map["articleId"], AttributeValue::N("42".into()));
    assert_eq!(from_item_map(map).unwrap(), item);
  }

  #[test]
  fn binary_sets_become_lists() {
    let value = AttributeValue::Bs(vec![Blob::new(vec![7u8])]);
    assert_eq!(
      from_attribute_value(value).unwrap(),
      AttrValue::L(vec![AttrValue::B(vec![7])])
    );
  }
}
