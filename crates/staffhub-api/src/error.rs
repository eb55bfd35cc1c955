//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure answers `{"error": "<message>"}`. Store failures carry a
//! per-operation message for the client; the underlying error is logged and
//! never sent.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use staffhub_core::store::StoreError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  NotFound(String),

  /// A backend failure. `context` is the client-facing message.
  #[error("{context}: {source}")]
  Store {
    context:       &'static str,
    configuration: bool,
    conflict:      bool,
    #[source]
    source:        Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("{0}")]
  Internal(&'static str),
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self { Self::BadRequest(message.into()) }

  pub fn not_authenticated() -> Self { Self::Unauthorized("Not authenticated".into()) }

  /// Wrap a store failure; use as `.map_err(ApiError::store("Failed to ..."))`.
  pub fn store<E: StoreError>(context: &'static str) -> impl FnOnce(E) -> Self {
    move |e| Self::Store {
      context,
      configuration: e.is_configuration(),
      conflict: e.is_conflict(),
      source: Box::new(e),
    }
  }
}

impl From<staffhub_core::Error> for ApiError {
  fn from(e: staffhub_core::Error) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { Self::BadRequest(e.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { Self::BadRequest(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Store { context, configuration: true, source, .. } => {
        tracing::error!(error = %source, "{context}: service is not configured");
        (StatusCode::INTERNAL_SERVER_ERROR, "Service is not configured".to_owned())
      }
      ApiError::Store { context, conflict: true, source, .. } => {
        tracing::warn!(error = %source, "{context}: concurrent modification");
        (StatusCode::CONFLICT, "Record was modified by someone else. Please try again.".to_owned())
      }
      ApiError::Store { context, source, .. } => {
        tracing::error!(error = %source, "{context}");
        (StatusCode::INTERNAL_SERVER_ERROR, context.to_owned())
      }
      ApiError::Internal(m) => {
        tracing::error!("{m}");
        (StatusCode::INTERNAL_SERVER_ERROR, m.to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
