//! Process wiring for the staffhub portal: configuration loading and the
//! Kintone-backed application router.

use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use staffhub_api::{AppState, SessionConfig, SessionKeys};
use staffhub_kintone::{KintoneConfig, KintoneStore};
use tower_http::trace::TraceLayer;

/// Prefix of environment overrides, e.g. `STAFFHUB__KINTONE__DOMAIN`.
pub const ENV_PREFIX: &str = "STAFFHUB";

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 3000 }

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:    String,
  #[serde(default = "default_port")]
  pub port:    u16,
  pub session: SessionConfig,
  pub kintone: KintoneConfig,
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("__")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read configuration")?;
    settings.try_deserialize().context("invalid configuration")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// The portal API over Kintone, with request tracing.
pub fn app(config: &ServerConfig) -> anyhow::Result<Router> {
  let sessions = SessionKeys::new(&config.session).context("invalid [session] configuration")?;
  let store = KintoneStore::from_config(&config.kintone).context("invalid [kintone] configuration")?;
  tracing::info!(
    origin = %config.kintone.origin().unwrap_or_default(),
    tokens = config.kintone.tokens.len(),
    "kintone store ready"
  );

  let state = AppState::new(Arc::new(store), sessions);
  Ok(staffhub_api::router(state).layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  const MINIMAL: &str = r#"
    [session]
    secret = "0123456789abcdef0123456789abcdef"

    [kintone]
    domain = "example.cybozu.com"

    [kintone.tokens]
    employees = "tok-emp"
  "#;

  #[test]
  fn minimal_config_fills_defaults() {
    let c = parse(MINIMAL);
    assert_eq!(c.address(), "0.0.0.0:3000");
    assert!(!c.session.secure_cookie);
    assert_eq!(c.kintone.timeout_secs, 30);
    assert_eq!(c.kintone.apps.employees.0, 303);
    assert_eq!(c.kintone.tokens["employees"], "tok-emp");
  }

  #[test]
  fn explicit_values_win() {
    let c = parse(
      r#"
      host = "127.0.0.1"
      port = 8080
      [session]
      secret = "0123456789abcdef0123456789abcdef"
      secure_cookie = true
      [kintone]
      domain = "example.cybozu.com"
      timeout_secs = 5
      [kintone.apps]
      dtr = 400
      [kintone.retry]
      max_attempts = 1
      "#,
    );
    assert_eq!(c.address(), "127.0.0.1:8080");
    assert!(c.session.secure_cookie);
    assert_eq!(c.kintone.apps.dtr.0, 400);
    assert_eq!(c.kintone.apps.loans.0, 311);
    assert_eq!(c.kintone.retry.max_attempts, 1);
  }

  #[test]
  fn app_refuses_a_weak_session_secret() {
    let mut c = parse(MINIMAL);
    c.session.secret = "short".into();
    assert!(app(&c).is_err());
  }

  #[test]
  fn app_builds_from_minimal_config() {
    assert!(app(&parse(MINIMAL)).is_ok());
  }
}
