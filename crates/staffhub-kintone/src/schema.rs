//! Field codes of each Kintone app and the mapping between their records
//! and the domain types.

use staffhub_core::{
  announcement::Announcement,
  benefits::Benefits,
  document::{DocumentRequest, DocumentStatus, NewDocumentRequest},
  dtr::{DtrRecord, DtrUpdate, NewDtrRecord, STATUS_PRESENT, format_hours},
  employee::{Employee, ProfileUpdate},
  leave::{LeaveBalance, LeaveRequest, LeaveStatus, NewLeaveRequest},
  loan::{Loan, LoanStatus},
  payroll::PayrollRecord,
  period::format_date,
};

use crate::record::{FieldMap, Record};

/// Field codes shared by several apps.
pub(crate) mod field {
  pub const EMPLOYEE_ID: &str = "employee_id";
  pub const EMPLOYEE_NAME: &str = "employee_name";
  pub const EMAIL: &str = "email";
  pub const DEPARTMENT: &str = "department";
  pub const STATUS: &str = "status";
  pub const CREATED_AT: &str = "created_at";
  pub const RECORD_ID: &str = "$id";
  pub const DATE: &str = "date";
  pub const PAY_PERIOD_START: &str = "pay_period_start";
  pub const START_DATE: &str = "start_date";
  pub const IS_ACTIVE: &str = "is_active";
  pub const PUBLISH_DATE: &str = "publish_date";
  pub const PRIORITY: &str = "priority";
}

const YES: &str = "Yes";

pub(crate) trait FromRecord: Sized {
  fn from_record(record: &Record) -> Self;
}

// ─── Reads ───────────────────────────────────────────────────────────────────

impl FromRecord for Employee {
  fn from_record(r: &Record) -> Self {
    Self {
      id:                 r.id(),
      revision:           r.revision(),
      employee_id:        r.text(field::EMPLOYEE_ID),
      email:              r.text(field::EMAIL),
      first_name:         r.text("first_name"),
      last_name:          r.text("last_name"),
      middle_name:        r.text("middle_name"),
      department:         r.text(field::DEPARTMENT),
      position:           r.text("position"),
      employment_status:  r.text("employment_status"),
      date_hired:         r.text("date_hired"),
      birth_date:         r.text("birth_date"),
      contact_number:     r.text("contact_number"),
      address:            r.text("address"),
      emergency_contact:  r.text("emergency_contact"),
      emergency_number:   r.text("emergency_number"),
      password_hash:      r.text("password_hash"),
      is_verified:        r.flag("is_verified"),
      verification_token: r.text("verification_token"),
    }
  }
}

impl FromRecord for LeaveRequest {
  fn from_record(r: &Record) -> Self {
    Self {
      id:            r.id(),
      employee_id:   r.text(field::EMPLOYEE_ID),
      employee_name: r.text(field::EMPLOYEE_NAME),
      leave_type:    r.text("leave_type"),
      start_date:    r.text(field::START_DATE),
      end_date:      r.text("end_date"),
      total_days:    r.number("total_days"),
      reason:        r.text("reason"),
      status:        LeaveStatus::from(r.text(field::STATUS)),
      approver:      r.text("approver"),
      approved_date: r.text("approved_date"),
      remarks:       r.text("remarks"),
      created_at:    r.text(field::CREATED_AT),
    }
  }
}

impl FromRecord for LeaveBalance {
  fn from_record(r: &Record) -> Self {
    Self {
      leave_type:    r.text("leave_type"),
      total_credits: r.number("total_credits"),
      used:          r.number("used"),
      remaining:     r.number("remaining"),
    }
  }
}

impl FromRecord for DocumentRequest {
  fn from_record(r: &Record) -> Self {
    Self {
      id:            r.id(),
      employee_id:   r.text(field::EMPLOYEE_ID),
      employee_name: r.text(field::EMPLOYEE_NAME),
      document_type: r.text("document_type"),
      purpose:       r.text("purpose"),
      quantity:      u32::try_from(r.integer_or("quantity", 1)).ok().filter(|q| *q > 0).unwrap_or(1),
      status:        DocumentStatus::from(r.text(field::STATUS)),
      remarks:       r.text("remarks"),
      release_date:  r.text("release_date"),
      created_at:    r.text(field::CREATED_AT),
    }
  }
}

impl FromRecord for Announcement {
  fn from_record(r: &Record) -> Self {
    Self {
      id:           r.id(),
      title:        r.text("title"),
      content:      r.text("content"),
      category:     r.text_or("category", "General"),
      priority:     r.text_or(field::PRIORITY, "Normal"),
      publish_date: r.text(field::PUBLISH_DATE),
      expiry_date:  r.text("expiry_date"),
      is_active:    r.flag(field::IS_ACTIVE),
    }
  }
}

impl FromRecord for DtrRecord {
  fn from_record(r: &Record) -> Self {
    Self {
      id:             r.id(),
      revision:       r.revision(),
      employee_id:    r.text(field::EMPLOYEE_ID),
      employee_name:  r.text(field::EMPLOYEE_NAME),
      date:           r.text(field::DATE),
      time_in:        r.text("time_in"),
      time_out:       r.text("time_out"),
      lunch_out:      r.text("lunch_out"),
      lunch_in:       r.text("lunch_in"),
      total_hours:    r.number("total_hours"),
      overtime_hours: r.number("overtime_hours"),
      late_minutes:   r.integer("late_minutes"),
      status:         r.text_or(field::STATUS, STATUS_PRESENT),
      remarks:        r.text("remarks"),
    }
  }
}

impl FromRecord for PayrollRecord {
  fn from_record(r: &Record) -> Self {
    Self {
      id:                   r.id(),
      employee_id:          r.text(field::EMPLOYEE_ID),
      period_start:         r.text(field::PAY_PERIOD_START),
      period_end:           r.text("pay_period_end"),
      basic_pay:            r.number("basic_pay"),
      overtime_pay:         r.number("overtime_pay"),
      holiday_pay:          r.number("holiday_pay"),
      allowances:           r.number("allowances"),
      gross_pay:            r.number("gross_pay"),
      sss_deduction:        r.number("sss_deduction"),
      philhealth_deduction: r.number("philhealth_deduction"),
      pagibig_deduction:    r.number("pagibig_deduction"),
      tax_deduction:        r.number("tax_deduction"),
      loan_deduction:       r.number("loan_deduction"),
      other_deductions:     r.number("other_deductions"),
      total_deductions:     r.number("total_deductions"),
      net_pay:              r.number("net_pay"),
      status:               r.text(field::STATUS),
      pay_date:             r.text("pay_date"),
    }
  }
}

impl FromRecord for Benefits {
  fn from_record(r: &Record) -> Self {
    Self {
      employee_id:           r.text(field::EMPLOYEE_ID),
      sss_number:            r.text("sss_number"),
      philhealth_number:     r.text("philhealth_number"),
      pagibig_number:        r.text("pagibig_number"),
      tin_number:            r.text("tin_number"),
      hmo_provider:          r.text("hmo_provider"),
      hmo_plan:              r.text("hmo_plan"),
      hmo_card_number:       r.text("hmo_card_number"),
      hmo_dependents:        u32::try_from(r.integer("hmo_dependents")).unwrap_or(0),
      life_insurance_policy: r.text("life_insurance_policy"),
      bank_name:             r.text("bank_name"),
      bank_account:          r.text("bank_account"),
    }
  }
}

impl FromRecord for Loan {
  fn from_record(r: &Record) -> Self {
    Self {
      id:                   r.id(),
      employee_id:          r.text(field::EMPLOYEE_ID),
      loan_type:            r.text("loan_type"),
      principal_amount:     r.number("principal_amount"),
      interest_rate:        r.number("interest_rate"),
      total_amount:         r.number("total_amount"),
      monthly_amortization: r.number("monthly_amortization"),
      total_paid:           r.number("total_paid"),
      balance:              r.number("balance"),
      start_date:           r.text(field::START_DATE),
      end_date:             r.text("end_date"),
      status:               LoanStatus::from(r.text(field::STATUS)),
    }
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

pub(crate) fn new_leave_request(req: &NewLeaveRequest) -> FieldMap {
  FieldMap::new()
    .set(field::EMPLOYEE_ID, req.employee_id.as_str())
    .set(field::EMPLOYEE_NAME, req.employee_name.as_str())
    .set("leave_type", req.leave_type.as_str())
    .set(field::START_DATE, format_date(req.start_date))
    .set("end_date", format_date(req.end_date))
    .set("total_days", req.total_days.to_string())
    .set("reason", req.reason.as_str())
    .set(field::STATUS, LeaveStatus::Pending.as_str())
    .set(field::CREATED_AT, format_date(req.created_at))
}

pub(crate) fn new_document_request(req: &NewDocumentRequest) -> FieldMap {
  FieldMap::new()
    .set(field::EMPLOYEE_ID, req.employee_id.as_str())
    .set(field::EMPLOYEE_NAME, req.employee_name.as_str())
    .set("document_type", req.document_type.as_str())
    .set("purpose", req.purpose.as_str())
    .set("quantity", req.quantity.to_string())
    .set(field::STATUS, DocumentStatus::Pending.as_str())
    .set(field::CREATED_AT, format_date(req.created_at))
}

pub(crate) fn new_dtr(rec: &NewDtrRecord) -> FieldMap {
  FieldMap::new()
    .set(field::EMPLOYEE_ID, rec.employee_id.as_str())
    .set(field::EMPLOYEE_NAME, rec.employee_name.as_str())
    .set(field::DATE, format_date(rec.date))
    .set("time_in", rec.time_in.as_str())
    .set(field::STATUS, rec.status.as_str())
    .set_opt("remarks", Some(rec.remarks.as_str()).filter(|r| !r.is_empty()))
}

pub(crate) fn dtr_update(update: &DtrUpdate) -> FieldMap {
  FieldMap::new()
    .set_opt("time_in", update.time_in.as_deref())
    .set_opt("time_out", update.time_out.as_deref())
    .set_opt("lunch_out", update.lunch_out.as_deref())
    .set_opt("lunch_in", update.lunch_in.as_deref())
    .set_opt("total_hours", update.total_hours.map(format_hours))
    .set_opt("overtime_hours", update.overtime_hours.map(format_hours))
    .set_opt(field::STATUS, update.status.as_deref())
    .set_opt("remarks", update.remarks.as_deref())
}

pub(crate) fn profile_update(update: &ProfileUpdate) -> FieldMap {
  FieldMap::new()
    .set_opt("contact_number", update.contact_number.as_deref())
    .set_opt("address", update.address.as_deref())
    .set_opt("emergency_contact", update.emergency_contact.as_deref())
    .set_opt("emergency_number", update.emergency_number.as_deref())
}

/// New password: the account becomes verified and the one-time token is
/// spent.
pub(crate) fn password(password_hash: &str) -> FieldMap {
  FieldMap::new()
    .set("password_hash", password_hash)
    .set("is_verified", YES)
    .set("verification_token", "")
}

pub(crate) fn verification_token(token: &str) -> FieldMap {
  FieldMap::new().set("verification_token", token)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use serde_json::json;

  use super::*;

  #[test]
  fn empty_records_map_to_documented_defaults() {
    let r = Record::default();

    let doc = DocumentRequest::from_record(&r);
    assert_eq!(doc.quantity, 1);
    assert_eq!(doc.status, DocumentStatus::Pending);

    let ann = Announcement::from_record(&r);
    assert_eq!((ann.category.as_str(), ann.priority.as_str()), ("General", "Normal"));
    assert!(!ann.is_active);

    assert_eq!(Loan::from_record(&r).status, LoanStatus::Active);
    assert_eq!(DtrRecord::from_record(&r).status, STATUS_PRESENT);
    assert_eq!(LeaveRequest::from_record(&r).status, LeaveStatus::Pending);
    assert_eq!(Benefits::from_record(&r), Benefits::default());
  }

  #[test]
  fn employee_maps_credentials_and_verification() {
    let r: Record = serde_json::from_value(json!({
      "$id":           { "type": "__ID__", "value": "17" },
      "$revision":     { "type": "__REVISION__", "value": "4" },
      "employee_id":   { "type": "SINGLE_LINE_TEXT", "value": "EMP-017" },
      "email":         { "type": "LINK", "value": "juan@example.com" },
      "first_name":    { "type": "SINGLE_LINE_TEXT", "value": "Juan" },
      "last_name":     { "type": "SINGLE_LINE_TEXT", "value": "Dela Cruz" },
      "password_hash": { "type": "SINGLE_LINE_TEXT", "value": "$argon2id$..." },
      "is_verified":   { "type": "DROP_DOWN", "value": "Yes" },
    }))
    .unwrap();
    let e = Employee::from_record(&r);
    assert_eq!((e.id, e.revision), (17, 4));
    assert_eq!(e.employee_id, "EMP-017");
    assert_eq!(e.full_name(), "Juan Dela Cruz");
    assert!(e.is_verified);
    assert_eq!(e.password_hash, "$argon2id$...");
  }

  #[test]
  fn payroll_reads_pay_period_fields() {
    let r = Record::from([
      ("pay_period_start", json!("2024-03-01")),
      ("pay_period_end", json!("2024-03-15")),
      ("net_pay", json!("12000")),
      ("tax_deduction", json!("")),
    ]);
    let p = PayrollRecord::from_record(&r);
    assert_eq!(p.period_start, "2024-03-01");
    assert_eq!(p.period_end, "2024-03-15");
    assert_eq!(p.net_pay, 12000.0);
    assert_eq!(p.tax_deduction, 0.0);
  }

  #[test]
  fn new_leave_request_is_written_pending() {
    let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    let fields = new_leave_request(&NewLeaveRequest {
      employee_id:   "EMP-001".into(),
      employee_name: "Maria Santos".into(),
      leave_type:    "Sick Leave".into(),
      start_date:    day(6),
      end_date:      day(7),
      total_days:    2.0,
      reason:        "Flu".into(),
      created_at:    day(1),
    });
    assert_eq!(fields.get("status"), Some("Pending"));
    assert_eq!(fields.get("total_days"), Some("2"));
    assert_eq!(fields.get("start_date"), Some("2024-05-06"));
    assert_eq!(fields.get("created_at"), Some("2024-05-01"));
  }

  #[test]
  fn updates_write_only_supplied_fields() {
    let fields = profile_update(&ProfileUpdate { address: Some("Cebu City".into()), ..Default::default() });
    assert_eq!(fields.len(), 1);
    assert_eq!(fields.get("address"), Some("Cebu City"));

    let fields = dtr_update(&DtrUpdate {
      time_out: Some("17:30".into()),
      total_hours: Some(8.5),
      overtime_hours: Some(0.5),
      ..Default::default()
    });
    assert_eq!(fields.len(), 3);
    assert_eq!(fields.get("total_hours"), Some("8.50"));
  }

  #[test]
  fn setting_a_password_spends_the_token() {
    let fields = password("hash");
    assert_eq!(fields.get("is_verified"), Some("Yes"));
    assert_eq!(fields.get("verification_token"), Some(""));
  }
}
