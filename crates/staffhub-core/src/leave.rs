//! Leave requests and leave-credit balances.
//!
//! Status changes happen in the record store's own approval workflow; this
//! service only creates requests (always `Pending`) and reads them back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  employee::Employee,
  period::parse_date,
};

/// Approval state of a leave request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeaveStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
  /// A value written by the store's workflow that this service does not know.
  Other(String),
}

impl LeaveStatus {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Pending => "Pending",
      Self::Approved => "Approved",
      Self::Rejected => "Rejected",
      Self::Other(s) => s,
    }
  }
}

impl From<&str> for LeaveStatus {
  fn from(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "" | "pending" => Self::Pending,
      "approved" => Self::Approved,
      "rejected" => Self::Rejected,
      _ => Self::Other(s.to_owned()),
    }
  }
}

impl From<String> for LeaveStatus {
  fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl From<LeaveStatus> for String {
  fn from(s: LeaveStatus) -> Self { s.as_str().to_owned() }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
  pub id:            u64,
  pub employee_id:   String,
  pub employee_name: String,
  pub leave_type:    String,
  pub start_date:    String,
  pub end_date:      String,
  pub total_days:    f64,
  pub reason:        String,
  pub status:        LeaveStatus,
  pub approver:      String,
  pub approved_date: String,
  pub remarks:       String,
  pub created_at:    String,
}

/// Per-employee, per-leave-type credit ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
  pub leave_type:    String,
  pub total_credits: f64,
  pub used:          f64,
  pub remaining:     f64,
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// The raw form an employee submits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveForm {
  #[serde(default)]
  pub leave_type: String,
  #[serde(default)]
  pub start_date: String,
  #[serde(default)]
  pub end_date:   String,
  pub total_days: Option<f64>,
  #[serde(default)]
  pub reason:     String,
}

/// A validated leave request ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
  pub employee_id:   String,
  pub employee_name: String,
  pub leave_type:    String,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub total_days:    f64,
  pub reason:        String,
  pub created_at:    NaiveDate,
}

impl LeaveForm {
  /// Check required fields and the date range.
  ///
  /// When `total_days` is missing or not positive, the inclusive calendar
  /// span of the range is used.
  pub fn validate(self, employee: &Employee, today: NaiveDate) -> Result<NewLeaveRequest> {
    let leave_type = self.leave_type.trim();
    let reason = self.reason.trim();
    if leave_type.is_empty()
      || self.start_date.trim().is_empty()
      || self.end_date.trim().is_empty()
      || reason.is_empty()
    {
      return Err(Error::invalid("All fields are required"));
    }

    let start_date = parse_date(&self.start_date)?;
    let end_date = parse_date(&self.end_date)?;
    if end_date < start_date {
      return Err(Error::invalid("End date cannot be before start date"));
    }

    let total_days = match self.total_days {
      Some(days) if days.is_finite() && days > 0.0 => days,
      _ => ((end_date - start_date).num_days() + 1) as f64,
    };

    Ok(NewLeaveRequest {
      employee_id: employee.employee_id.clone(),
      employee_name: employee.full_name(),
      leave_type: leave_type.to_owned(),
      start_date,
      end_date,
      total_days,
      reason: reason.to_owned(),
      created_at: today,
    })
  }
}
