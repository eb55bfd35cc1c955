//! Handlers for `/dtr` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dtr` | `?month=YYYY-MM` optional |
//! | `GET`  | `/dtr/today` | Clock widget state |
//! | `POST` | `/dtr/clock` | Body: `{"action": "in"\|"lunch_out"\|"lunch_in"\|"out", "location"?}` |

use std::sync::Arc;

use axum::{Json, extract::State};
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::{Value, json};
use staffhub_core::{
  dtr::{self, ClockAction, ClockContext, ClockPlan, TodayStatus},
  period::MonthPeriod,
  store::HrStore,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{ApiJson, ApiQuery, AppState, error::ApiError, session::CurrentUser};

const CLOCK_FAILED: &str = "Failed to process clock action";

// ─── Locks ───────────────────────────────────────────────────────────────────

/// One async mutex per employee code, serializing that employee's clock
/// actions within this process.
#[derive(Debug, Default)]
pub struct ClockLocks(DashMap<String, Arc<Mutex<()>>>);

impl ClockLocks {
  pub async fn lock(&self, employee_id: &str) -> OwnedMutexGuard<()> {
    // The map shard guard must be released before awaiting.
    let mutex = Arc::clone(self.0.entry(employee_id.to_owned()).or_default().value());
    mutex.lock_owned().await
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub month: Option<String>,
}

/// `GET /dtr[?month=YYYY-MM]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let month = params
    .month
    .as_deref()
    .map(str::trim)
    .filter(|m| !m.is_empty())
    .map(str::parse::<MonthPeriod>)
    .transpose()?;

  let records = state
    .store
    .dtr_records(&employee.employee_id, month)
    .await
    .map_err(ApiError::store("Failed to fetch DTR"))?;
  Ok(Json(json!({ "records": records })))
}

// ─── Today ───────────────────────────────────────────────────────────────────

/// `GET /dtr/today`
pub async fn today<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<TodayStatus>, ApiError>
where
  S: HrStore + 'static,
{
  let record = state
    .store
    .dtr_for_day(&employee.employee_id, state.wall_clock.today())
    .await
    .map_err(ApiError::store("Failed to get status"))?;
  Ok(Json(TodayStatus::of(record.as_ref())))
}

// ─── Clock ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClockBody {
  #[serde(default)]
  pub action:   String,
  pub location: Option<String>,
}

/// `POST /dtr/clock`
///
/// Today's record is re-read under the employee's lock, so two concurrent
/// clock-ins produce one record and one rejection.
pub async fn clock<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
  ApiJson(body): ApiJson<ClockBody>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let action: ClockAction = body.action.parse()?;
  let _guard = state.clock_locks.lock(&employee.employee_id).await;

  let now = state.wall_clock.now();
  let today = state
    .store
    .dtr_for_day(&employee.employee_id, now.date())
    .await
    .map_err(ApiError::store(CLOCK_FAILED))?;

  let employee_name = employee.full_name();
  let ctx = ClockContext {
    employee_id: &employee.employee_id,
    employee_name: &employee_name,
    location: body.location.as_deref(),
    now,
  };
  match dtr::plan(action, today.as_ref(), ctx)? {
    ClockPlan::Create(record) => {
      state.store.create_dtr(&record).await.map_err(ApiError::store(CLOCK_FAILED))?;
    }
    ClockPlan::Update { record_id, revision, changes } => {
      state
        .store
        .update_dtr(record_id, revision, &changes)
        .await
        .map_err(ApiError::store(CLOCK_FAILED))?;
    }
  }

  let time = dtr::format_clock_time(now.time());
  tracing::info!(employee = %employee.employee_id, action = action.as_str(), %time, "clock action recorded");
  Ok(Json(json!({ "success": true, "action": action.as_str(), "time": time })))
}
