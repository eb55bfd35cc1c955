//! Payroll periods and year-to-date totals.
//!
//! Monetary values are kept at full `f64` precision; rounding to two decimals
//! is a display concern of whoever renders them.

use serde::{Deserialize, Serialize};

/// One pay period's earnings, deductions and net pay. Read only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
  pub id:                   u64,
  pub employee_id:          String,
  pub period_start:         String,
  pub period_end:           String,
  pub basic_pay:            f64,
  pub overtime_pay:         f64,
  pub holiday_pay:          f64,
  pub allowances:           f64,
  pub gross_pay:            f64,
  pub sss_deduction:        f64,
  pub philhealth_deduction: f64,
  pub pagibig_deduction:    f64,
  pub tax_deduction:        f64,
  pub loan_deduction:       f64,
  pub other_deductions:     f64,
  pub total_deductions:     f64,
  pub net_pay:              f64,
  pub status:               String,
  pub pay_date:             String,
}

/// Sums over the fetched pay periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearToDate {
  pub periods:          usize,
  pub basic_pay:        f64,
  pub overtime_pay:     f64,
  pub gross_pay:        f64,
  pub tax_deduction:    f64,
  pub total_deductions: f64,
  pub net_pay:          f64,
}

impl YearToDate {
  pub fn from_records(records: &[PayrollRecord]) -> Self {
    records.iter().fold(Self::default(), |acc, r| Self {
      periods:          acc.periods + 1,
      basic_pay:        acc.basic_pay + r.basic_pay,
      overtime_pay:     acc.overtime_pay + r.overtime_pay,
      gross_pay:        acc.gross_pay + r.gross_pay,
      tax_deduction:    acc.tax_deduction + r.tax_deduction,
      total_deductions: acc.total_deductions + r.total_deductions,
      net_pay:          acc.net_pay + r.net_pay,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_year_is_all_zero() {
    assert_eq!(YearToDate::from_records(&[]), YearToDate::default());
  }

  #[test]
  fn sums_every_period() {
    let a = PayrollRecord { gross_pay: 15_000.0, total_deductions: 1_250.5, net_pay: 13_749.5, ..Default::default() };
    let b = PayrollRecord { gross_pay: 15_500.0, total_deductions: 1_300.0, net_pay: 14_200.0, ..Default::default() };
    let ytd = YearToDate::from_records(&[a, b]);
    assert_eq!(ytd.periods, 2);
    assert_eq!(ytd.gross_pay, 30_500.0);
    assert_eq!(ytd.total_deductions, 2_550.5);
    assert_eq!(ytd.net_pay, 27_949.5);
    assert_eq!(ytd.basic_pay, 0.0);
  }
}
