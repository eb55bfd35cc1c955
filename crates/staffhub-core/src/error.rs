//! Error types for `staffhub-core`.
//!
//! Every variant carries a message that is safe to show to the end user; these
//! are raised before any call to the record store is made.

use thiserror::Error;

use crate::dtr::ClockRejection;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A required field was missing or a value failed a business rule.
  #[error("{0}")]
  Invalid(String),

  #[error("invalid date {0:?}, expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("invalid month {0:?}, expected YYYY-MM")]
  InvalidMonth(String),

  #[error("invalid time {0:?}, expected HH:MM")]
  InvalidTime(String),

  #[error(transparent)]
  Clock(#[from] ClockRejection),
}

impl Error {
  pub fn invalid(message: impl Into<String>) -> Self {
    Self::Invalid(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
