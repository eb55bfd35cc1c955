//! Handlers for `/leave` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/leave` | The employee's requests, newest first |
//! | `POST` | `/leave` | Body: [`LeaveForm`]; always filed as `Pending` |
//! | `GET`  | `/leave/balance` | Credits per leave type |

use axum::{Json, extract::State};
use serde_json::{Value, json};
use staffhub_core::{leave::LeaveForm, store::HrStore};

use crate::{ApiJson, AppState, error::ApiError, session::CurrentUser};

/// `GET /leave`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let requests = state
    .store
    .leave_requests(&employee.employee_id)
    .await
    .map_err(ApiError::store("Failed to fetch leave requests"))?;
  Ok(Json(json!({ "requests": requests })))
}

/// `POST /leave`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
  ApiJson(form): ApiJson<LeaveForm>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let request = form.validate(&employee, state.wall_clock.today())?;
  let id = state
    .store
    .create_leave_request(&request)
    .await
    .map_err(ApiError::store("Failed to submit leave request"))?;

  tracing::info!(employee = %employee.employee_id, id, kind = %request.leave_type, "leave request filed");
  Ok(Json(json!({
    "success": true,
    "id": id,
    "message": "Leave request submitted successfully",
  })))
}

/// `GET /leave/balance`
pub async fn balances<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let balances = state
    .store
    .leave_balances(&employee.employee_id)
    .await
    .map_err(ApiError::store("Failed to fetch leave balances"))?;
  Ok(Json(json!({ "balances": balances })))
}
