//! Error type for `staffhub-kintone`.

use staffhub_core::store::StoreError;
use thiserror::Error;

use crate::config::AppId;

#[derive(Debug, Error)]
pub enum Error {
  /// No token is configured for the app; raised before any request is sent.
  #[error("no API token configured for app {app}")]
  MissingToken { app: AppId },

  #[error("invalid kintone configuration: {0}")]
  Config(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// A non-2xx answer from Kintone.
  #[error("kintone API error {status} [{code}]: {message}")]
  Api {
    status:  u16,
    code:    String,
    message: String,
  },

  #[error("record {id} not found in app {app}")]
  NotFound { app: AppId, id: u64 },

  /// The record changed since `revision` was read.
  #[error("record {id} in app {app} changed since revision {revision}")]
  RevisionConflict { app: AppId, id: u64, revision: u64 },

  #[error("unexpected response: {0}")]
  Decode(String),
}

impl StoreError for Error {
  fn is_configuration(&self) -> bool {
    matches!(self, Self::MissingToken { .. } | Self::Config(_))
  }

  fn is_conflict(&self) -> bool { matches!(self, Self::RevisionConflict { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
