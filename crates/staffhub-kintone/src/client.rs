//! HTTP client for the Kintone REST API.

use std::{sync::Arc, time::Duration};

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
  Error, Result,
  config::{AppId, AppTokens, KintoneConfig, RetryPolicy},
  query::Query,
  record::{Created, FieldMap, RawCreated, RawRecord, RawRecordsPage, RawUpdated, Record, RecordsPage},
};

pub const TOKEN_HEADER: &str = "X-Cybozu-API-Token";

/// Largest page Kintone serves from `records.json`.
pub const MAX_PAGE_SIZE: usize = 500;

const REVISION_MISMATCH: &str = "GAIA_CO02";
const RECORD_NOT_FOUND: &str = "GAIA_RE01";

/// Which failures an attempt may be replayed after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
  /// Reads and revision-guarded updates.
  Transient,
  /// Inserts: only when the request never reached the server, or the server
  /// refused it with 429.
  Unsent,
}

#[derive(Clone)]
pub struct KintoneClient {
  http:   reqwest::Client,
  origin: String,
  tokens: Arc<AppTokens>,
  retry:  RetryPolicy,
}

impl KintoneClient {
  pub fn new(config: &KintoneConfig) -> Result<Self> {
    let tokens = AppTokens::from_names(&config.apps, &config.tokens)?;
    Self::with_tokens(config.origin()?, tokens, config.timeout(), config.retry)
  }

  pub fn with_tokens(
    origin: impl Into<String>,
    tokens: AppTokens,
    timeout: Duration,
    retry: RetryPolicy,
  ) -> Result<Self> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      http,
      origin: origin.into().trim_end_matches('/').to_owned(),
      tokens: Arc::new(tokens),
      retry,
    })
  }

  fn token(&self, app: AppId) -> Result<&str> {
    self.tokens.get(app).ok_or(Error::MissingToken { app })
  }

  fn url(&self, endpoint: &str) -> String { format!("{}/k/v1/{endpoint}", self.origin) }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_records(
    &self,
    app: AppId,
    query: &Query,
    fields: &[&str],
    total_count: bool,
  ) -> Result<RecordsPage> {
    let mut params = vec![("app".to_owned(), app.to_string()), ("query".to_owned(), query.to_string())];
    params.extend(fields.iter().enumerate().map(|(i, f)| (format!("fields[{i}]"), (*f).to_owned())));
    if total_count {
      params.push(("totalCount".to_owned(), "true".to_owned()));
    }

    let url = self.url("records.json");
    let raw: RawRecordsPage = self
      .execute(app, Replay::Transient, || self.http.get(&url).query(&params))
      .await?;
    Ok(raw.into())
  }

  /// Every record matching `query`, fetched in pages of [`MAX_PAGE_SIZE`].
  /// Any limit or offset already on `query` is replaced.
  pub async fn get_all_records(&self, app: AppId, query: &Query, fields: &[&str]) -> Result<Vec<Record>> {
    let mut all = Vec::new();
    loop {
      let page = query.clone().limit(MAX_PAGE_SIZE).offset(all.len());
      let batch = self.get_records(app, &page, fields, false).await?.records;
      let short = batch.len() < MAX_PAGE_SIZE;
      all.extend(batch);
      if short {
        return Ok(all);
      }
    }
  }

  pub async fn get_record(&self, app: AppId, id: u64) -> Result<Record> {
    let url = self.url("record.json");
    let params = [("app", app.to_string()), ("id", id.to_string())];
    match self.execute::<RawRecord, _>(app, Replay::Transient, || self.http.get(&url).query(&params)).await {
      Ok(raw) => Ok(raw.record),
      Err(Error::Api { code, .. }) if code == RECORD_NOT_FOUND => Err(Error::NotFound { app, id }),
      Err(e) => Err(e),
    }
  }

  // ── Writes ────────────────────────────────────────────────────────────

  pub async fn add_record(&self, app: AppId, record: &FieldMap) -> Result<Created> {
    let url = self.url("record.json");
    let body = json!({ "app": app, "record": record });
    let raw: RawCreated = self.execute(app, Replay::Unsent, || self.http.post(&url).json(&body)).await?;
    Ok(Created { id: parse_number(&raw.id)?, revision: parse_number(&raw.revision)? })
  }

  /// Update `id`, guarded by the revision the caller read. Returns the new
  /// revision.
  pub async fn update_record(&self, app: AppId, id: u64, record: &FieldMap, revision: u64) -> Result<u64> {
    let url = self.url("record.json");
    let body = json!({ "app": app, "id": id, "record": record, "revision": revision });
    match self.execute::<RawUpdated, _>(app, Replay::Transient, || self.http.put(&url).json(&body)).await {
      Ok(raw) => parse_number(&raw.revision),
      Err(Error::Api { status, code, .. })
        if status == StatusCode::CONFLICT.as_u16() || code == REVISION_MISMATCH =>
      {
        Err(Error::RevisionConflict { app, id, revision })
      }
      Err(Error::Api { code, .. }) if code == RECORD_NOT_FOUND => Err(Error::NotFound { app, id }),
      Err(e) => Err(e),
    }
  }

  // ── Transport ─────────────────────────────────────────────────────────

  /// Send the request built by `build`, retrying per `replay` and the
  /// configured policy. The token is resolved before anything is sent.
  async fn execute<T, F>(&self, app: AppId, replay: Replay, build: F) -> Result<T>
  where
    T: DeserializeOwned,
    F: Fn() -> RequestBuilder,
  {
    let token = self.token(app)?;
    let max_attempts = self.retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
      let request = build().header(TOKEN_HEADER, token);
      let (error, retryable) = match request.send().await {
        Ok(response) if response.status().is_success() => {
          let bytes = response.bytes().await?;
          return serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()));
        }
        Ok(response) => {
          let status = response.status();
          let retryable = match replay {
            Replay::Transient => is_transient(status),
            Replay::Unsent => status == StatusCode::TOO_MANY_REQUESTS,
          };
          (api_error(response).await, retryable)
        }
        Err(e) => {
          let retryable = match replay {
            Replay::Transient => e.is_connect() || e.is_timeout(),
            Replay::Unsent => e.is_connect(),
          };
          (Error::Http(e), retryable)
        }
      };

      if retryable && attempt < max_attempts {
        let delay = self.retry.delay(attempt);
        tracing::warn!(%app, attempt, ?delay, error = %error, "kintone request failed, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
        continue;
      }

      match &error {
        // Rejections the caller maps to its own outcome (missing record,
        // stale revision, bad query).
        Error::Api { status, code, .. } if *status < 500 => {
          tracing::warn!(%app, status, code = code.as_str(), error = %error, "kintone rejected request");
        }
        Error::Api { status, code, .. } => {
          tracing::error!(%app, status, code = code.as_str(), error = %error, "kintone request failed");
        }
        _ => tracing::error!(%app, error = %error, "kintone request failed"),
      }
      return Err(error);
    }
  }
}

fn is_transient(status: StatusCode) -> bool {
  status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
  #[serde(default)]
  code:    String,
  #[serde(default)]
  message: String,
}

async fn api_error(response: Response) -> Error {
  let status = response.status();
  let body = response.bytes().await.ok();
  let parsed: ApiErrorBody = body
    .as_deref()
    .and_then(|b| serde_json::from_slice(b).ok())
    .unwrap_or_default();
  let message = if parsed.message.is_empty() {
    status.canonical_reason().unwrap_or("request failed").to_owned()
  } else {
    parsed.message
  };
  Error::Api { status: status.as_u16(), code: parsed.code, message }
}

fn parse_number(s: &str) -> Result<u64> {
  s.trim().parse().map_err(|_| Error::Decode(format!("expected a numeric id, got {s:?}")))
}
