//! Dashboard aggregates.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboard` | The employee's overview; sections degrade independently |
//! | `GET`  | `/admin/executive-dashboard` | `?department=` optional, `all` means every department |

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use staffhub_core::{
  document::{DocumentRequest, DocumentStatus},
  leave::{LeaveRequest, LeaveStatus},
  store::HrStore,
  summary::{DocumentStats, Headcount, LeaveBuckets, LeaveStats, PendingCounts},
};

use crate::{
  ApiQuery, AppState,
  announcements::AnnouncementView,
  error::ApiError,
  session::CurrentUser,
};

const RECENT_LEAVE: usize = 5;
const RECENT_REQUESTS: usize = 20;
const DASHBOARD_FAILED: &str = "Failed to fetch dashboard data";

/// Keep a section's data, or note it as unavailable and log why.
fn section<T, E: std::error::Error>(
  name: &'static str,
  result: Result<T, E>,
  unavailable: &mut Vec<&'static str>,
) -> Option<T> {
  match result {
    Ok(value) => Some(value),
    Err(e) => {
      tracing::error!(error = %e, section = name, "dashboard section unavailable");
      unavailable.push(name);
      None
    }
  }
}

// ─── Employee ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLeave {
  pub id:         u64,
  #[serde(rename = "type")]
  pub leave_type: String,
  pub start_date: String,
  pub end_date:   String,
  pub status:     LeaveStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementCard {
  pub id:           u64,
  pub title:        String,
  pub category:     String,
  pub priority:     String,
  pub publish_date: String,
}

impl From<AnnouncementView> for AnnouncementCard {
  fn from(a: AnnouncementView) -> Self {
    Self {
      id:           a.id,
      title:        a.title,
      category:     a.category,
      priority:     a.priority,
      publish_date: a.publish_date,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
  pub leave_balance:    LeaveBuckets,
  pub pending_requests: PendingCounts,
  pub recent_leave:     Vec<RecentLeave>,
  pub announcements:    Vec<AnnouncementCard>,
  /// Sections whose data could not be fetched; they show defaults.
  pub unavailable:      Vec<&'static str>,
}

/// `GET /dashboard`
pub async fn employee<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Json<EmployeeDashboard>
where
  S: HrStore + 'static,
{
  let code = employee.employee_id.as_str();
  let (leave, balances, documents, announcements) = tokio::join!(
    state.store.leave_requests(code),
    state.store.leave_balances(code),
    state.store.document_requests(code),
    state.store.active_announcements(state.wall_clock.today()),
  );

  let mut unavailable = Vec::new();
  let leave = section("recentLeave", leave, &mut unavailable);
  let balances = section("leaveBalance", balances, &mut unavailable);
  let documents = section("documents", documents, &mut unavailable);
  let announcements = section("announcements", announcements, &mut unavailable);

  let leave = leave.unwrap_or_default();
  let pending_requests = PendingCounts::count(&leave, documents.as_deref().unwrap_or_default());
  let recent_leave = leave
    .into_iter()
    .take(RECENT_LEAVE)
    .map(|r| RecentLeave {
      id:         r.id,
      leave_type: r.leave_type,
      start_date: r.start_date,
      end_date:   r.end_date,
      status:     r.status,
    })
    .collect();
  let announcements = announcements
    .unwrap_or_default()
    .into_iter()
    .map(|a| AnnouncementCard::from(AnnouncementView::from(a)))
    .collect();

  Json(EmployeeDashboard {
    leave_balance: balances.map(|b| LeaveBuckets::from_balances(&b)).unwrap_or_default(),
    pending_requests,
    recent_leave,
    announcements,
    unavailable,
  })
}

// ─── Executive ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExecutiveParams {
  pub department: Option<String>,
}

impl ExecutiveParams {
  /// `None` when every department is requested.
  fn department(&self) -> Option<&str> {
    self
      .department
      .as_deref()
      .map(str::trim)
      .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("all"))
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLeaveRequest {
  pub id:            u64,
  pub employee_name: String,
  pub leave_type:    String,
  pub start_date:    String,
  pub end_date:      String,
  pub status:        LeaveStatus,
  pub total_days:    f64,
}

impl From<LeaveRequest> for RecentLeaveRequest {
  fn from(r: LeaveRequest) -> Self {
    Self {
      id:            r.id,
      employee_name: r.employee_name,
      leave_type:    r.leave_type,
      start_date:    r.start_date,
      end_date:      r.end_date,
      status:        r.status,
      total_days:    r.total_days,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDocumentRequest {
  pub id:            u64,
  pub employee_name: String,
  pub document_type: String,
  pub status:        DocumentStatus,
  pub created_at:    String,
}

impl From<DocumentRequest> for RecentDocumentRequest {
  fn from(r: DocumentRequest) -> Self {
    Self {
      id:            r.id,
      employee_name: r.employee_name,
      document_type: r.document_type,
      status:        r.status,
      created_at:    r.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveDashboard {
  pub total_employees:          usize,
  pub employees_by_department:  BTreeMap<String, usize>,
  pub employees_by_status:      BTreeMap<String, usize>,
  pub leave_stats:              LeaveStats,
  pub document_stats:           DocumentStats,
  pub recent_leave_requests:    Vec<RecentLeaveRequest>,
  pub recent_document_requests: Vec<RecentDocumentRequest>,
}

/// `GET /admin/executive-dashboard[?department=...]`
///
/// Unlike the employee dashboard this fails as a whole.
pub async fn executive<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  ApiQuery(params): ApiQuery<ExecutiveParams>,
) -> Result<Json<ExecutiveDashboard>, ApiError>
where
  S: HrStore + 'static,
{
  let (employees, leave, documents) = tokio::join!(
    state.store.list_employees(params.department()),
    state.store.recent_leave_requests(),
    state.store.recent_document_requests(),
  );
  let employees = employees.map_err(ApiError::store(DASHBOARD_FAILED))?;
  let leave = leave.map_err(ApiError::store(DASHBOARD_FAILED))?;
  let documents = documents.map_err(ApiError::store(DASHBOARD_FAILED))?;

  let headcount = Headcount::count(&employees);
  let leave_stats = LeaveStats::count(&leave);
  let document_stats = DocumentStats::count(&documents);

  Ok(Json(ExecutiveDashboard {
    total_employees: headcount.total,
    employees_by_department: headcount.by_department,
    employees_by_status: headcount.by_status,
    leave_stats,
    document_stats,
    recent_leave_requests: leave.into_iter().take(RECENT_REQUESTS).map(Into::into).collect(),
    recent_document_requests: documents.into_iter().take(RECENT_REQUESTS).map(Into::into).collect(),
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(department: Option<&str>) -> ExecutiveParams {
    ExecutiveParams { department: department.map(str::to_owned) }
  }

  #[test]
  fn all_and_blank_departments_mean_no_filter() {
    assert_eq!(params(None).department(), None);
    assert_eq!(params(Some("all")).department(), None);
    assert_eq!(params(Some("  ")).department(), None);
    assert_eq!(params(Some("Finance")).department(), Some("Finance"));
  }

  #[test]
  fn failed_sections_are_listed() {
    let mut unavailable = Vec::new();
    let ok: Option<u8> = section("a", Ok::<_, std::fmt::Error>(1), &mut unavailable);
    let failed: Option<u8> = section("b", Err(std::fmt::Error), &mut unavailable);
    assert_eq!(ok, Some(1));
    assert_eq!(failed, None);
    assert_eq!(unavailable, ["b"]);
  }
}
