//! Handlers for `/documents` endpoints.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use staffhub_core::{document::DocumentForm, store::HrStore};

use crate::{ApiJson, AppState, error::ApiError, session::CurrentUser};

/// `GET /documents`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let requests = state
    .store
    .document_requests(&employee.employee_id)
    .await
    .map_err(ApiError::store("Failed to fetch document requests"))?;
  Ok(Json(json!({ "requests": requests })))
}

/// `POST /documents`, body: [`DocumentForm`]
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
  ApiJson(form): ApiJson<DocumentForm>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let request = form.validate(&employee, state.wall_clock.today())?;
  let id = state
    .store
    .create_document_request(&request)
    .await
    .map_err(ApiError::store("Failed to submit document request"))?;

  tracing::info!(employee = %employee.employee_id, id, kind = %request.document_type, "document request filed");
  Ok(Json(json!({
    "success": true,
    "id": id,
    "message": "Document request submitted successfully",
  })))
}
