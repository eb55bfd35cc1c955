//! Read-path aggregates for the employee and executive dashboards.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  document::{DocumentRequest, DocumentStatus},
  employee::Employee,
  leave::{LeaveBalance, LeaveRequest, LeaveStatus},
};

/// Label used when a grouping field is blank.
pub const UNKNOWN_GROUP: &str = "Unknown";

// ─── Employee dashboard ──────────────────────────────────────────────────────

/// Remaining credits for the three leave types shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LeaveBuckets {
  pub vacation:  f64,
  pub sick:      f64,
  pub emergency: f64,
}

impl LeaveBuckets {
  /// Classify by leave type name (`"Vacation Leave"`, `"VL"`, ...). Types
  /// that match no bucket are ignored; a later balance of the same bucket
  /// overwrites an earlier one.
  pub fn from_balances(balances: &[LeaveBalance]) -> Self {
    let mut buckets = Self::default();
    for b in balances {
      let kind = b.leave_type.to_lowercase();
      if kind.contains("vacation") || kind.contains("vl") {
        buckets.vacation = b.remaining;
      } else if kind.contains("sick") || kind.contains("sl") {
        buckets.sick = b.remaining;
      } else if kind.contains("emergency") || kind.contains("el") {
        buckets.emergency = b.remaining;
      }
    }
    buckets
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingCounts {
  pub leave:     usize,
  pub documents: usize,
}

impl PendingCounts {
  pub fn count(leave: &[LeaveRequest], documents: &[DocumentRequest]) -> Self {
    Self {
      leave:     leave.iter().filter(|r| r.status == LeaveStatus::Pending).count(),
      documents: documents.iter().filter(|r| r.status == DocumentStatus::Pending).count(),
    }
  }
}

// ─── Executive dashboard ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headcount {
  pub total:         usize,
  pub by_department: BTreeMap<String, usize>,
  pub by_status:     BTreeMap<String, usize>,
}

impl Headcount {
  pub fn count(employees: &[Employee]) -> Self {
    let group = |s: &str| if s.is_empty() { UNKNOWN_GROUP.to_owned() } else { s.to_owned() };
    let mut out = Self { total: employees.len(), ..Default::default() };
    for e in employees {
      *out.by_department.entry(group(&e.department)).or_default() += 1;
      *out.by_status.entry(group(&e.employment_status)).or_default() += 1;
    }
    out
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaveStats {
  pub pending:  usize,
  pub approved: usize,
  pub rejected: usize,
  pub total:    usize,
}

impl LeaveStats {
  pub fn count(requests: &[LeaveRequest]) -> Self {
    let mut s = Self { total: requests.len(), ..Default::default() };
    for r in requests {
      match r.status {
        LeaveStatus::Pending => s.pending += 1,
        LeaveStatus::Approved => s.approved += 1,
        LeaveStatus::Rejected => s.rejected += 1,
        LeaveStatus::Other(_) => {}
      }
    }
    s
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
  pub pending:    usize,
  pub processing: usize,
  pub ready:      usize,
  pub released:   usize,
  pub total:      usize,
}

impl DocumentStats {
  pub fn count(requests: &[DocumentRequest]) -> Self {
    let mut s = Self { total: requests.len(), ..Default::default() };
    for r in requests {
      match r.status {
        DocumentStatus::Pending => s.pending += 1,
        DocumentStatus::Processing => s.processing += 1,
        DocumentStatus::Ready => s.ready += 1,
        DocumentStatus::Released => s.released += 1,
        DocumentStatus::Other(_) => {}
      }
    }
    s
  }
}
