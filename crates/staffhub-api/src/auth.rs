//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Sets the session cookie |
//! | `POST` | `/auth/logout` | Clears the session cookie |
//! | `POST` | `/auth/activate` | Sends an activation link |
//! | `PUT`  | `/auth/activate` | Sets the password from a link token; signs in |
//! | `POST` | `/auth/forgot-password` | Sends a reset link; never reveals whether the email exists |

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use staffhub_core::{
  employee::{Employee, normalize_email, validate_email, validate_password},
  store::HrStore,
};

use crate::{ApiJson, AppState, error::ApiError, notify::Notice, password};

const RESET_SENT: &str = "If your email exists in our system, you will receive a reset link";

/// Sign `employee` in: issue a session token and attach its cookie.
fn sign_in<S>(state: &AppState<S>, jar: CookieJar, employee: &Employee) -> Result<CookieJar, ApiError> {
  let token = state.sessions.issue(employee, Utc::now()).map_err(|e| {
    tracing::error!(error = %e, "failed to sign session token");
    ApiError::Internal("An error occurred. Please try again.")
  })?;
  Ok(jar.add(state.sessions.cookie(token)))
}

/// Trimmed, lowercased and structurally valid; `missing` when blank.
fn email_field(email: &str, missing: &str) -> Result<String, ApiError> {
  let email = normalize_email(email);
  if email.is_empty() {
    return Err(ApiError::bad_request(missing));
  }
  validate_email(&email)?;
  Ok(email)
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
  pub id:         u64,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
}

impl From<&Employee> for SessionUser {
  fn from(e: &Employee) -> Self {
    Self {
      id:         e.id,
      email:      e.email.clone(),
      first_name: e.first_name.clone(),
      last_name:  e.last_name.clone(),
    }
  }
}

/// `POST /auth/login`, body: `{"email": "...", "password": "..."}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<(CookieJar, Json<Value>), ApiError>
where
  S: HrStore + 'static,
{
  let email = normalize_email(&body.email);
  if email.is_empty() || body.password.is_empty() {
    return Err(ApiError::bad_request("Email and password are required"));
  }

  let employee = state
    .store
    .employee_by_email(&email)
    .await
    .map_err(ApiError::store("An error occurred during login"))?
    .ok_or_else(|| ApiError::Unauthorized("Email not found. Please contact HR.".into()))?;

  if !employee.is_activated() {
    return Err(ApiError::Unauthorized(
      "Account not activated. Please check your email for activation link.".into(),
    ));
  }
  if !password::verify_blocking(body.password, employee.password_hash.clone()).await {
    return Err(ApiError::Unauthorized("Invalid password.".into()));
  }

  tracing::info!(employee = %employee.employee_id, "signed in");
  let jar = sign_in(&state, jar, &employee)?;
  Ok((jar, Json(json!({ "success": true, "user": SessionUser::from(&employee) }))))
}

/// `POST /auth/logout`
pub async fn logout<S>(State(state): State<AppState<S>>, jar: CookieJar) -> (CookieJar, Json<Value>)
where
  S: HrStore + 'static,
{
  (jar.remove(state.sessions.removal()), Json(json!({ "success": true })))
}

// ─── Activation ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EmailBody {
  #[serde(default)]
  pub email: String,
}

/// `POST /auth/activate`, body: `{"email": "..."}`
pub async fn request_activation<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<EmailBody>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let email = email_field(&body.email, "Email is required")?;
  const FAILED: &str = "An error occurred. Please try again.";

  let employee = state
    .store
    .employee_by_email(&email)
    .await
    .map_err(ApiError::store(FAILED))?
    .ok_or_else(|| ApiError::NotFound("Email not found in our records. Please contact HR.".into()))?;
  if employee.is_activated() {
    return Err(ApiError::bad_request("Account is already activated. Please login."));
  }

  let token = password::verification_token();
  state
    .store
    .set_verification_token(employee.id, employee.revision, &token)
    .await
    .map_err(ApiError::store(FAILED))?;

  let notice = Notice::Activation { email: &employee.email, first_name: &employee.first_name, token: &token };
  if let Err(e) = state.notifier.notify(&notice) {
    tracing::error!(error = %e, employee = %employee.employee_id, "activation notice failed");
    return Err(ApiError::Internal("Failed to send activation email. Please try again."));
  }

  Ok(Json(json!({ "success": true, "message": "Activation link sent to your email" })))
}

#[derive(Debug, Deserialize)]
pub struct ActivateBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub token:    String,
  #[serde(default)]
  pub password: String,
}

/// `PUT /auth/activate`, body: `{"email", "token", "password"}`
///
/// Also completes a password reset: both links carry the same kind of token.
pub async fn activate<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  ApiJson(body): ApiJson<ActivateBody>,
) -> Result<(CookieJar, Json<Value>), ApiError>
where
  S: HrStore + 'static,
{
  let email = normalize_email(&body.email);
  if email.is_empty() || body.token.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::bad_request("Missing required fields"));
  }
  validate_password(&body.password)?;
  const FAILED: &str = "An error occurred. Please try again.";

  let mut employee = state
    .store
    .employee_by_email(&email)
    .await
    .map_err(ApiError::store(FAILED))?
    .ok_or_else(|| ApiError::bad_request("Invalid activation link"))?;
  if !employee.verification_token_matches(body.token.trim()) {
    return Err(ApiError::bad_request("Invalid or expired activation link"));
  }

  let hash = password::hash_blocking(body.password)
    .await
    .ok_or(ApiError::Internal(FAILED))?;
  employee.revision = state
    .store
    .set_password(employee.id, employee.revision, &hash)
    .await
    .map_err(ApiError::store(FAILED))?;

  tracing::info!(employee = %employee.employee_id, "account activated");
  let jar = sign_in(&state, jar, &employee)?;
  Ok((jar, Json(json!({ "success": true, "message": "Account activated successfully" }))))
}

// ─── Password reset ──────────────────────────────────────────────────────────

/// `POST /auth/forgot-password`, body: `{"email": "..."}`
pub async fn forgot_password<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<EmailBody>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let email = email_field(&body.email, "Email is required")?;
  const FAILED: &str = "An error occurred. Please try again.";
  let sent = Json(json!({ "success": true, "message": RESET_SENT }));

  let Some(employee) = state
    .store
    .employee_by_email(&email)
    .await
    .map_err(ApiError::store(FAILED))?
    .filter(Employee::is_activated)
  else {
    return Ok(sent);
  };

  let token = password::verification_token();
  state
    .store
    .set_verification_token(employee.id, employee.revision, &token)
    .await
    .map_err(ApiError::store(FAILED))?;

  let notice = Notice::PasswordReset { email: &employee.email, first_name: &employee.first_name, token: &token };
  if let Err(e) = state.notifier.notify(&notice) {
    tracing::error!(error = %e, employee = %employee.employee_id, "password reset notice failed");
  }
  Ok(sent)
}
