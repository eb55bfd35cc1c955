//! Employee loans and amortisation progress.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanStatus {
  #[default]
  Active,
  Completed,
  Other(String),
}

impl LoanStatus {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Active => "Active",
      Self::Completed => "Completed",
      Self::Other(s) => s,
    }
  }
}

impl From<&str> for LoanStatus {
  fn from(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "" | "active" => Self::Active,
      "completed" => Self::Completed,
      _ => Self::Other(s.to_owned()),
    }
  }
}

impl From<String> for LoanStatus {
  fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl From<LoanStatus> for String {
  fn from(s: LoanStatus) -> Self { s.as_str().to_owned() }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
  pub id:                   u64,
  pub employee_id:          String,
  pub loan_type:            String,
  pub principal_amount:     f64,
  pub interest_rate:        f64,
  pub total_amount:         f64,
  pub monthly_amortization: f64,
  pub total_paid:           f64,
  pub balance:              f64,
  pub start_date:           String,
  pub end_date:             String,
  pub status:               LoanStatus,
}

impl Loan {
  /// `total_paid / total_amount * 100`, clamped to `[0, 100]`. A zero (or
  /// otherwise unusable) total yields `0`.
  pub fn payoff_percent(&self) -> f64 {
    if !(self.total_amount.is_finite() && self.total_amount > 0.0) {
      return 0.0;
    }
    let pct = self.total_paid / self.total_amount * 100.0;
    if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 }
  }
}

/// Totals shown above the loan list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
  pub active_loans:        usize,
  pub outstanding_balance: f64,
  pub total_paid:          f64,
}

impl LoanSummary {
  pub fn from_loans(loans: &[Loan]) -> Self {
    loans.iter().fold(Self::default(), |mut acc, loan| {
      acc.total_paid += loan.total_paid;
      if loan.status == LoanStatus::Active {
        acc.active_loans += 1;
        acc.outstanding_balance += loan.balance;
      }
      acc
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn loan(paid: f64, total: f64) -> Loan {
    Loan { total_paid: paid, total_amount: total, ..Default::default() }
  }

  #[test]
  fn zero_total_is_zero_percent() {
    assert_eq!(loan(0.0, 0.0).payoff_percent(), 0.0);
    assert_eq!(loan(50.0, 0.0).payoff_percent(), 0.0);
  }

  #[test]
  fn half_paid_is_fifty_percent() {
    assert_eq!(loan(50.0, 100.0).payoff_percent(), 50.0);
  }

  #[test]
  fn overpayment_is_clamped() {
    assert_eq!(loan(150.0, 100.0).payoff_percent(), 100.0);
    assert_eq!(loan(-10.0, 100.0).payoff_percent(), 0.0);
  }

  #[test]
  fn summary_counts_only_active_balances() {
    let active = Loan { balance: 4_000.0, total_paid: 1_000.0, ..Default::default() };
    let done = Loan {
      balance: 0.0,
      total_paid: 5_000.0,
      status: LoanStatus::Completed,
      ..Default::default()
    };
    let s = LoanSummary::from_loans(&[active, done]);
    assert_eq!(s.active_loans, 1);
    assert_eq!(s.outstanding_balance, 4_000.0);
    assert_eq!(s.total_paid, 6_000.0);
  }
}
