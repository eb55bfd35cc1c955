//! The `HrStore` trait: every read and write the portal performs.
//!
//! The trait is implemented by record-store backends (e.g. `staffhub-kintone`).
//! The API layer depends on this abstraction, not on any concrete backend.
//!
//! Employees are referred to by their HR employee code (`employee_id`) in
//! every cross-entity lookup; the store's record id is used only to address
//! the employee row itself.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  announcement::Announcement,
  benefits::Benefits,
  document::{DocumentRequest, NewDocumentRequest},
  dtr::{DtrRecord, DtrUpdate, NewDtrRecord},
  employee::{Employee, ProfileUpdate},
  leave::{LeaveBalance, LeaveRequest, NewLeaveRequest},
  loan::Loan,
  payroll::PayrollRecord,
  period::{MonthPeriod, YearPeriod},
};

/// Backend errors must say whether they are a deployment problem (e.g. a
/// missing credential) rather than a failure of the remote store, and
/// whether a write lost a race against a concurrent change.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_configuration(&self) -> bool { false }

  /// The row changed since the revision the write was guarded by.
  fn is_conflict(&self) -> bool { false }
}

impl StoreError for std::convert::Infallible {}

/// Abstraction over the record store holding all HR data.
///
/// Writes that change an existing row take the revision the caller read, and
/// return the new revision; a stale revision is an error, never a silent
/// overwrite.
pub trait HrStore: Send + Sync {
  type Error: StoreError;

  // ── Employees ─────────────────────────────────────────────────────────

  fn employee_by_email(
    &self,
    email: &str,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send;

  fn employee_by_record_id(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send;

  fn employee_by_code(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send;

  /// All employees, optionally restricted to one department.
  fn list_employees(
    &self,
    department: Option<&str>,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send;

  /// Store a new password hash, mark the account verified and clear the
  /// verification token.
  fn set_password(
    &self,
    id: u64,
    revision: u64,
    password_hash: &str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  fn set_verification_token(
    &self,
    id: u64,
    revision: u64,
    token: &str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  fn update_profile(
    &self,
    id: u64,
    revision: u64,
    update: &ProfileUpdate,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  // ── Leave ─────────────────────────────────────────────────────────────

  /// An employee's requests, newest first.
  fn leave_requests(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = Result<Vec<LeaveRequest>, Self::Error>> + Send;

  /// Requests across all employees, newest first.
  fn recent_leave_requests(
    &self,
  ) -> impl Future<Output = Result<Vec<LeaveRequest>, Self::Error>> + Send;

  /// Returns the new record id.
  fn create_leave_request(
    &self,
    request: &NewLeaveRequest,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  fn leave_balances(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = Result<Vec<LeaveBalance>, Self::Error>> + Send;

  // ── Documents ─────────────────────────────────────────────────────────

  fn document_requests(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = Result<Vec<DocumentRequest>, Self::Error>> + Send;

  fn recent_document_requests(
    &self,
  ) -> impl Future<Output = Result<Vec<DocumentRequest>, Self::Error>> + Send;

  fn create_document_request(
    &self,
    request: &NewDocumentRequest,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  // ── Announcements ─────────────────────────────────────────────────────

  /// Active announcements published on or before `today` and not yet
  /// expired, highest priority first.
  fn active_announcements(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Announcement>, Self::Error>> + Send;

  // ── DTR ───────────────────────────────────────────────────────────────

  fn dtr_for_day(
    &self,
    employee_id: &str,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DtrRecord>, Self::Error>> + Send;

  /// Newest first, optionally limited to one month.
  fn dtr_records(
    &self,
    employee_id: &str,
    month: Option<MonthPeriod>,
  ) -> impl Future<Output = Result<Vec<DtrRecord>, Self::Error>> + Send;

  fn create_dtr(
    &self,
    record: &NewDtrRecord,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  fn update_dtr(
    &self,
    id: u64,
    revision: u64,
    update: &DtrUpdate,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

  // ── Compensation ──────────────────────────────────────────────────────

  /// Newest pay period first, optionally limited to one year.
  fn payroll(
    &self,
    employee_id: &str,
    year: Option<YearPeriod>,
  ) -> impl Future<Output = Result<Vec<PayrollRecord>, Self::Error>> + Send;

  fn benefits(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = Result<Option<Benefits>, Self::Error>> + Send;

  /// Newest loan first.
  fn loans(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = Result<Vec<Loan>, Self::Error>> + Send;
}
