//! Core types and trait definitions for the staffhub HR portal.
//!
//! This crate is deliberately free of HTTP and runtime dependencies. It holds
//! the domain model for every record type the portal reads or writes, the
//! validation applied before anything reaches the record store, the DTR clock
//! state machine, and the [`store::HrStore`] abstraction that backends
//! implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod announcement;
pub mod benefits;
pub mod document;
pub mod dtr;
pub mod employee;
pub mod error;
pub mod leave;
pub mod loan;
pub mod payroll;
pub mod period;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
