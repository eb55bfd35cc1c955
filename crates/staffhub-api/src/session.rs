//! Cookie sessions: an HS256 JWT in the `auth_token` cookie, and the
//! [`CurrentUser`] extractor that resolves it to an employee.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
  CookieJar,
  cookie::{Cookie, SameSite},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use staffhub_core::{employee::Employee, store::HrStore};
use thiserror::Error;

use crate::{AppState, error::ApiError};

pub const SESSION_COOKIE: &str = "auth_token";
pub const SESSION_TTL_DAYS: i64 = 7;
/// HS256 keys shorter than this are refused at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// The `[session]` configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
  pub secret:        String,
  /// Mark the cookie `Secure`; enable whenever served over HTTPS.
  #[serde(default)]
  pub secure_cookie: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("session.secret must be at least {MIN_SECRET_LEN} bytes")]
  WeakSecret,
  #[error("failed to sign session token: {0}")]
  Sign(#[from] jsonwebtoken::errors::Error),
}

/// Token payload. `sub` is the employee's record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
  pub sub:        String,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub iat:        i64,
  pub exp:        i64,
}

impl Claims {
  pub fn record_id(&self) -> Option<u64> { self.sub.parse().ok() }
}

pub struct SessionKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  secure:   bool,
}

impl SessionKeys {
  pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
    if config.secret.len() < MIN_SECRET_LEN {
      return Err(SessionError::WeakSecret);
    }
    Ok(Self {
      encoding: EncodingKey::from_secret(config.secret.as_bytes()),
      decoding: DecodingKey::from_secret(config.secret.as_bytes()),
      secure:   config.secure_cookie,
    })
  }

  pub fn issue(&self, employee: &Employee, now: DateTime<Utc>) -> Result<String, SessionError> {
    let claims = Claims {
      sub:        employee.id.to_string(),
      email:      employee.email.clone(),
      first_name: employee.first_name.clone(),
      last_name:  employee.last_name.clone(),
      iat:        now.timestamp(),
      exp:        (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
    };
    Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
  }

  /// Decode and check signature and expiry. Any failure is `None`.
  pub fn verify(&self, token: &str) -> Option<Claims> {
    decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
      .map(|data| data.claims)
      .ok()
  }

  pub fn cookie(&self, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
      .path("/")
      .http_only(true)
      .same_site(SameSite::Lax)
      .secure(self.secure)
      .max_age(time::Duration::days(SESSION_TTL_DAYS))
      .build()
  }

  /// A cookie that, passed to [`CookieJar::remove`], clears the session.
  pub fn removal(&self) -> Cookie<'static> { Cookie::build(SESSION_COOKIE).path("/").build() }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The signed-in employee, reloaded from the store on every request.
pub struct CurrentUser(pub Employee);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: HrStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &AppState<S>) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let claims = jar
      .get(SESSION_COOKIE)
      .and_then(|c| state.sessions.verify(c.value()))
      .ok_or_else(ApiError::not_authenticated)?;
    let id = claims.record_id().ok_or_else(ApiError::not_authenticated)?;

    let employee = state
      .store
      .employee_by_record_id(id)
      .await
      .map_err(ApiError::store("Failed to get user data"))?
      .ok_or_else(ApiError::not_authenticated)?;
    Ok(CurrentUser(employee))
  }
}
