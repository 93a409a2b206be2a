//! SQLite backend for the LaZone article store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Scan semantics follow the managed
//! store: `limit` bounds the rows evaluated, the filter runs afterwards, and
//! the continuation token is the last evaluated key.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
