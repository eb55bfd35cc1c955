//! Handlers for payroll, payslips, benefits and loans. All read only.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/payroll` | `?year=YYYY`, default the current year; includes year-to-date totals |
//! | `GET`  | `/payslips` | Every pay period on file |
//! | `GET`  | `/benefits` | Blank fields when no row exists |
//! | `GET`  | `/loans` | Each loan with its payoff percentage |

use axum::{Json, extract::State};
use chrono::Datelike as _;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use staffhub_core::{
  benefits::Benefits,
  loan::{Loan, LoanSummary},
  payroll::YearToDate,
  period::YearPeriod,
  store::HrStore,
};

use crate::{ApiQuery, AppState, error::ApiError, session::CurrentUser};

#[derive(Debug, Deserialize)]
pub struct PayrollParams {
  pub year: Option<String>,
}

fn parse_year(raw: Option<&str>, current: i32) -> Result<YearPeriod, ApiError> {
  match raw.map(str::trim).filter(|y| !y.is_empty()) {
    None => Ok(YearPeriod(current)),
    Some(y) => y
      .parse::<i32>()
      .ok()
      .filter(|y| (1900..=9999).contains(y))
      .map(YearPeriod)
      .ok_or_else(|| ApiError::bad_request(format!("invalid year {y:?}, expected YYYY"))),
  }
}

/// `GET /payroll[?year=YYYY]`
pub async fn payroll<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
  ApiQuery(params): ApiQuery<PayrollParams>,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let year = parse_year(params.year.as_deref(), state.wall_clock.today().year())?;
  let records = state
    .store
    .payroll(&employee.employee_id, Some(year))
    .await
    .map_err(ApiError::store("Failed to fetch payroll"))?;
  let ytd = YearToDate::from_records(&records);
  Ok(Json(json!({ "records": records, "ytd": ytd })))
}

/// `GET /payslips`
pub async fn payslips<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let payslips = state
    .store
    .payroll(&employee.employee_id, None)
    .await
    .map_err(ApiError::store("Failed to fetch payslips"))?;
  Ok(Json(json!({ "payslips": payslips })))
}

/// `GET /benefits`
pub async fn benefits<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<Benefits>, ApiError>
where
  S: HrStore + 'static,
{
  let benefits = state
    .store
    .benefits(&employee.employee_id)
    .await
    .map_err(ApiError::store("Failed to fetch benefits"))?
    .unwrap_or_else(|| Benefits { employee_id: employee.employee_id.clone(), ..Default::default() });
  Ok(Json(benefits))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
  #[serde(flatten)]
  pub loan:           Loan,
  pub payoff_percent: f64,
}

/// `GET /loans`
pub async fn loans<S>(
  State(state): State<AppState<S>>,
  CurrentUser(employee): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let loans = state
    .store
    .loans(&employee.employee_id)
    .await
    .map_err(ApiError::store("Failed to fetch loans"))?;
  let summary = LoanSummary::from_loans(&loans);
  let records: Vec<LoanView> = loans
    .into_iter()
    .map(|loan| LoanView { payoff_percent: loan.payoff_percent(), loan })
    .collect();
  Ok(Json(json!({ "records": records, "summary": summary })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn year_defaults_to_current() {
    assert_eq!(parse_year(None, 2025).unwrap(), YearPeriod(2025));
    assert_eq!(parse_year(Some("  "), 2025).unwrap(), YearPeriod(2025));
  }

  #[test]
  fn explicit_year_is_used() {
    assert_eq!(parse_year(Some("2023"), 2025).unwrap(), YearPeriod(2023));
  }

  #[test]
  fn garbage_year_is_rejected() {
    assert!(parse_year(Some("twenty"), 2025).is_err());
    assert!(parse_year(Some("12"), 2025).is_err());
  }
}
