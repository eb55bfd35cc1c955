//! Kintone backend for the staffhub record store.
//!
//! [`KintoneClient`] speaks the Kintone REST API: it routes every call to the
//! API token of the app it targets, shapes queries and JSON bodies, and
//! retries transient failures. [`KintoneStore`] layers the typed
//! [`staffhub_core::store::HrStore`] operations on top of it.

mod schema;
mod store;

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod record;

pub use client::KintoneClient;
pub use config::{AppId, AppTokens, Apps, KintoneConfig, RetryPolicy};
pub use error::{Error, Result};
pub use store::KintoneStore;

#[cfg(test)]
mod tests;
