//! Core types and trait definitions for the LaZone article service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Store backends and the HTTP layer depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod attr;
pub mod error;
pub mod filter;
pub mod params;
pub mod publisher;
pub mod query;
pub mod store;

pub use error::{Error, Result};
pub use query::{MAX_ITEMS, QueryEngine};
