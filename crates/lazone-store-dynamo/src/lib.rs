//! DynamoDB backend for the LaZone article store.
//!
//! Predicates are rendered as a `FilterExpression` with attribute-name and
//! attribute-value placeholders, and pagination uses the table's own
//! `LastEvaluatedKey` / `ExclusiveStartKey` protocol.

mod convert;
mod expr;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use expr::{FilterExpression, render};
pub use store::DynamoStore;
