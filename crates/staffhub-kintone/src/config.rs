//! Connection settings: domain, app ids, API tokens and retry policy.

use std::{collections::HashMap, fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Numeric id of a Kintone app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub u32);

impl fmt::Display for AppId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Apps ────────────────────────────────────────────────────────────────────

/// Which app holds which entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Apps {
  pub employees:         AppId,
  pub leave_requests:    AppId,
  pub document_requests: AppId,
  pub announcements:     AppId,
  pub leave_balances:    AppId,
  pub dtr:               AppId,
  pub payroll:           AppId,
  pub benefits:          AppId,
  pub loans:             AppId,
}

impl Default for Apps {
  fn default() -> Self {
    Self {
      employees:         AppId(303),
      leave_requests:    AppId(304),
      document_requests: AppId(305),
      announcements:     AppId(306),
      leave_balances:    AppId(307),
      dtr:               AppId(308),
      payroll:           AppId(309),
      benefits:          AppId(310),
      loans:             AppId(311),
    }
  }
}

impl Apps {
  /// Configuration name of every app, as used under `kintone.tokens`.
  pub fn named(&self) -> [(&'static str, AppId); 9] {
    [
      ("employees", self.employees),
      ("leave_requests", self.leave_requests),
      ("document_requests", self.document_requests),
      ("announcements", self.announcements),
      ("leave_balances", self.leave_balances),
      ("dtr", self.dtr),
      ("payroll", self.payroll),
      ("benefits", self.benefits),
      ("loans", self.loans),
    ]
  }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// App id → API token. Kintone tokens are scoped to a single app.
#[derive(Debug, Clone, Default)]
pub struct AppTokens(HashMap<AppId, String>);

impl AppTokens {
  pub fn new() -> Self { Self::default() }

  /// Add a token; blank tokens are ignored.
  pub fn with(mut self, app: AppId, token: impl Into<String>) -> Self {
    let token = token.into();
    if !token.trim().is_empty() {
      self.0.insert(app, token);
    }
    self
  }

  /// Resolve tokens keyed by app name against `apps`.
  pub fn from_names(apps: &Apps, tokens: &HashMap<String, String>) -> Result<Self> {
    if let Some(unknown) = tokens.keys().find(|name| !apps.named().iter().any(|(n, _)| *n == name.as_str())) {
      return Err(Error::Config(format!("token configured for unknown app `{unknown}`")));
    }
    Ok(apps.named().into_iter().fold(Self::new(), |acc, (name, app)| match tokens.get(name) {
      Some(token) => acc.with(app, token.as_str()),
      None => acc,
    }))
  }

  pub fn get(&self, app: AppId) -> Option<&str> { self.0.get(&app).map(String::as_str) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

// ─── Retry ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
  /// Total attempts including the first; `1` disables retries.
  pub max_attempts:  u32,
  pub base_delay_ms: u64,
  pub max_delay_ms:  u64,
}

impl Default for RetryPolicy {
  fn default() -> Self { Self { max_attempts: 3, base_delay_ms: 200, max_delay_ms: 2_000 } }
}

impl RetryPolicy {
  /// Backoff before attempt `attempt + 1`, doubling from the base delay.
  pub fn delay(&self, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(16);
    Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms))
  }
}

// ─── Config ──────────────────────────────────────────────────────────────────

fn default_timeout_secs() -> u64 { 30 }

/// The `[kintone]` configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct KintoneConfig {
  /// Subdomain host, e.g. `example.cybozu.com`.
  pub domain:       String,
  /// Overrides `https://{domain}`.
  #[serde(default)]
  pub base_url:     Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  #[serde(default)]
  pub retry:        RetryPolicy,
  #[serde(default)]
  pub apps:         Apps,
  #[serde(default)]
  pub tokens:       HashMap<String, String>,
}

impl KintoneConfig {
  pub fn origin(&self) -> Result<String> {
    let origin = match &self.base_url {
      Some(url) if !url.trim().is_empty() => url.trim().to_owned(),
      _ if self.domain.trim().is_empty() => {
        return Err(Error::Config("kintone.domain is not set".into()));
      }
      _ => format!("https://{}", self.domain.trim()),
    };
    Ok(origin.trim_end_matches('/').to_owned())
  }

  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}
