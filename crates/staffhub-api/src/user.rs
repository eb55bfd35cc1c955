//! Handlers for `/user` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/user/me` | The signed-in employee's profile |
//! | `PUT`  | `/user/profile` | Body: [`ProfileUpdate`]; contact fields only |

use axum::{Json, extract::State};
use serde_json::{Value, json};
use staffhub_core::{employee::ProfileUpdate, store::HrStore};

use crate::{ApiJson, AppState, error::ApiError, session::CurrentUser};

/// `GET /user/me`
pub async fn me<S>(CurrentUser(employee): CurrentUser) -> Json<Value>
where
  S: HrStore + 'static,
{
  Json(json!({ "user": employee }))
}

/// `PUT /user/profile`
pub async fn update_profile<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
  ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let update = ProfileUpdate {
    contact_number:    update.contact_number.map(|s| s.trim().to_owned()),
    address:           update.address.map(|s| s.trim().to_owned()),
    emergency_contact: update.emergency_contact.map(|s| s.trim().to_owned()),
    emergency_number:  update.emergency_number.map(|s| s.trim().to_owned()),
  };
  state
    .store
    .update_profile(employee.id, employee.revision, &update)
    .await
    .map_err(ApiError::store("Failed to update profile"))?;

  Ok(Json(json!({ "success": true, "message": "Profile updated successfully" })))
}
