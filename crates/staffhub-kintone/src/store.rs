//! [`KintoneStore`]: the Kintone implementation of [`HrStore`].

use chrono::NaiveDate;
use staffhub_core::{
  announcement::{ANNOUNCEMENT_LIMIT, Announcement},
  benefits::Benefits,
  document::{DocumentRequest, NewDocumentRequest},
  dtr::{DtrRecord, DtrUpdate, NewDtrRecord},
  employee::{Employee, ProfileUpdate},
  leave::{LeaveBalance, LeaveRequest, NewLeaveRequest},
  loan::Loan,
  payroll::PayrollRecord,
  period::{MonthPeriod, YearPeriod, format_date},
  store::HrStore,
};

use crate::{
  Error, KintoneClient, KintoneConfig, Result,
  config::{AppId, Apps},
  query::{Order, Query},
  record::FieldMap,
  schema::{self, FromRecord, field},
};

/// Page size of per-employee history lists.
const HISTORY_LIMIT: usize = 100;
const PAYROLL_LIMIT: usize = 50;
/// Page size of the cross-employee lists on the executive dashboard.
const RECENT_LIMIT: usize = 500;

// ─── Store ───────────────────────────────────────────────────────────────────

/// HR records kept in Kintone apps, one app per entity.
///
/// Cloning is cheap; the HTTP client and token table are shared.
#[derive(Clone)]
pub struct KintoneStore {
  client: KintoneClient,
  apps:   Apps,
}

impl KintoneStore {
  pub fn new(client: KintoneClient, apps: Apps) -> Self { Self { client, apps } }

  pub fn from_config(config: &KintoneConfig) -> Result<Self> {
    Ok(Self::new(KintoneClient::new(config)?, config.apps))
  }

  pub fn client(&self) -> &KintoneClient { &self.client }

  async fn find<T: FromRecord>(&self, app: AppId, query: Query) -> Result<Vec<T>> {
    let page = self.client.get_records(app, &query, &[], false).await?;
    Ok(page.records.iter().map(T::from_record).collect())
  }

  async fn find_all<T: FromRecord>(&self, app: AppId, query: Query) -> Result<Vec<T>> {
    let records = self.client.get_all_records(app, &query, &[]).await?;
    Ok(records.iter().map(T::from_record).collect())
  }

  async fn first<T: FromRecord>(&self, app: AppId, query: Query) -> Result<Option<T>> {
    Ok(self.find(app, query.limit(1)).await?.into_iter().next())
  }

  async fn create(&self, app: AppId, fields: FieldMap) -> Result<u64> {
    let created = self.client.add_record(app, &fields).await?;
    tracing::debug!(%app, id = created.id, "record created");
    Ok(created.id)
  }

  async fn update(&self, app: AppId, id: u64, revision: u64, fields: FieldMap) -> Result<u64> {
    if fields.is_empty() {
      return Ok(revision);
    }
    self.client.update_record(app, id, &fields, revision).await
  }

  fn by_employee(employee_id: &str) -> Query { Query::new().eq(field::EMPLOYEE_ID, employee_id) }

  fn newest_first(query: Query) -> Query { query.order_by(field::RECORD_ID, Order::Desc) }
}

// ─── HrStore impl ────────────────────────────────────────────────────────────

impl HrStore for KintoneStore {
  type Error = Error;

  // ── Employees ─────────────────────────────────────────────────────────

  async fn employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
    self.first(self.apps.employees, Query::new().eq(field::EMAIL, email)).await
  }

  async fn employee_by_record_id(&self, id: u64) -> Result<Option<Employee>> {
    match self.client.get_record(self.apps.employees, id).await {
      Ok(record) => Ok(Some(Employee::from_record(&record))),
      Err(Error::NotFound { .. }) => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn employee_by_code(&self, employee_id: &str) -> Result<Option<Employee>> {
    self.first(self.apps.employees, Self::by_employee(employee_id)).await
  }

  async fn list_employees(&self, department: Option<&str>) -> Result<Vec<Employee>> {
    let query = match department {
      Some(d) => Query::new().eq(field::DEPARTMENT, d),
      None => Query::new(),
    };
    self.find_all(self.apps.employees, query.order_by(field::RECORD_ID, Order::Asc)).await
  }

  async fn set_password(&self, id: u64, revision: u64, password_hash: &str) -> Result<u64> {
    self.update(self.apps.employees, id, revision, schema::password(password_hash)).await
  }

  async fn set_verification_token(&self, id: u64, revision: u64, token: &str) -> Result<u64> {
    self.update(self.apps.employees, id, revision, schema::verification_token(token)).await
  }

  async fn update_profile(&self, id: u64, revision: u64, update: &ProfileUpdate) -> Result<u64> {
    self.update(self.apps.employees, id, revision, schema::profile_update(update)).await
  }

  // ── Leave ─────────────────────────────────────────────────────────────

  async fn leave_requests(&self, employee_id: &str) -> Result<Vec<LeaveRequest>> {
    let query = Self::newest_first(Self::by_employee(employee_id)).limit(HISTORY_LIMIT);
    self.find(self.apps.leave_requests, query).await
  }

  async fn recent_leave_requests(&self) -> Result<Vec<LeaveRequest>> {
    self.find(self.apps.leave_requests, Self::newest_first(Query::new()).limit(RECENT_LIMIT)).await
  }

  async fn create_leave_request(&self, request: &NewLeaveRequest) -> Result<u64> {
    self.create(self.apps.leave_requests, schema::new_leave_request(request)).await
  }

  async fn leave_balances(&self, employee_id: &str) -> Result<Vec<LeaveBalance>> {
    self.find_all(self.apps.leave_balances, Self::by_employee(employee_id)).await
  }

  // ── Documents ─────────────────────────────────────────────────────────

  async fn document_requests(&self, employee_id: &str) -> Result<Vec<DocumentRequest>> {
    let query = Self::newest_first(Self::by_employee(employee_id)).limit(HISTORY_LIMIT);
    self.find(self.apps.document_requests, query).await
  }

  async fn recent_document_requests(&self) -> Result<Vec<DocumentRequest>> {
    self.find(self.apps.document_requests, Self::newest_first(Query::new()).limit(RECENT_LIMIT)).await
  }

  async fn create_document_request(&self, request: &NewDocumentRequest) -> Result<u64> {
    self.create(self.apps.document_requests, schema::new_document_request(request)).await
  }

  // ── Announcements ─────────────────────────────────────────────────────

  async fn active_announcements(&self, today: NaiveDate) -> Result<Vec<Announcement>> {
    let query = Query::new()
      .any_of(field::IS_ACTIVE, ["Yes"])
      .lte(field::PUBLISH_DATE, format_date(today))
      .order_by(field::PRIORITY, Order::Desc)
      .limit(ANNOUNCEMENT_LIMIT);
    let found: Vec<Announcement> = self.find(self.apps.announcements, query).await?;
    Ok(found.into_iter().filter(|a| !a.is_expired_on(today)).collect())
  }

  // ── DTR ───────────────────────────────────────────────────────────────

  async fn dtr_for_day(&self, employee_id: &str, date: NaiveDate) -> Result<Option<DtrRecord>> {
    let query = Self::newest_first(Self::by_employee(employee_id).on(field::DATE, date));
    self.first(self.apps.dtr, query).await
  }

  async fn dtr_records(&self, employee_id: &str, month: Option<MonthPeriod>) -> Result<Vec<DtrRecord>> {
    let mut query = Self::by_employee(employee_id);
    if let Some(month) = month {
      query = query.in_month(field::DATE, month);
    }
    self.find(self.apps.dtr, query.order_by(field::DATE, Order::Desc).limit(HISTORY_LIMIT)).await
  }

  async fn create_dtr(&self, record: &NewDtrRecord) -> Result<u64> {
    self.create(self.apps.dtr, schema::new_dtr(record)).await
  }

  async fn update_dtr(&self, id: u64, revision: u64, update: &DtrUpdate) -> Result<u64> {
    self.update(self.apps.dtr, id, revision, schema::dtr_update(update)).await
  }

  // ── Compensation ──────────────────────────────────────────────────────

  async fn payroll(&self, employee_id: &str, year: Option<YearPeriod>) -> Result<Vec<PayrollRecord>> {
    let mut query = Self::by_employee(employee_id);
    if let Some(year) = year {
      query = query.in_year(field::PAY_PERIOD_START, year);
    }
    let query = query.order_by(field::PAY_PERIOD_START, Order::Desc).limit(PAYROLL_LIMIT);
    self.find(self.apps.payroll, query).await
  }

  async fn benefits(&self, employee_id: &str) -> Result<Option<Benefits>> {
    self.first(self.apps.benefits, Self::by_employee(employee_id)).await
  }

  async fn loans(&self, employee_id: &str) -> Result<Vec<Loan>> {
    let query = Self::by_employee(employee_id).order_by(field::START_DATE, Order::Desc);
    self.find_all(self.apps.loans, query).await
  }
}
