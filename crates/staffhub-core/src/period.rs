//! Calendar periods used to scope DTR and payroll reads.
//!
//! The record store compares dates as `YYYY-MM-DD` strings, so every bound
//! produced here is a real calendar date rendered in that form.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Wire format of every date field in the record store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

// ─── Month ───────────────────────────────────────────────────────────────────

/// A calendar month, parsed from `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPeriod {
  year:  i32,
  month: u32,
}

impl MonthPeriod {
  pub fn new(year: i32, month: u32) -> Result<Self> {
    NaiveDate::from_ymd_opt(year, month, 1)
      .map(|_| Self { year, month })
      .ok_or_else(|| Error::InvalidMonth(format!("{year:04}-{month:02}")))
  }

  pub fn year(&self) -> i32 { self.year }

  pub fn month(&self) -> u32 { self.month }

  pub fn first_day(&self) -> NaiveDate {
    NaiveDate::from_ymd_opt(self.year, self.month, 1)
      .unwrap_or(NaiveDate::MIN)
  }

  /// The real last day of the month (28, 29, 30 or 31).
  pub fn last_day(&self) -> NaiveDate {
    let (y, m) = if self.month == 12 {
      (self.year + 1, 1)
    } else {
      (self.year, self.month + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
      .and_then(|d| d.pred_opt())
      .unwrap_or(NaiveDate::MAX)
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    date.year() == self.year && date.month() == self.month
  }
}

impl FromStr for MonthPeriod {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidMonth(s.to_owned());
    let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
    if y.len() != 4 || m.is_empty() || m.len() > 2 {
      return Err(invalid());
    }
    let year = y.parse().map_err(|_| invalid())?;
    let month = m.parse().map_err(|_| invalid())?;
    Self::new(year, month).map_err(|_| invalid())
  }
}

impl fmt::Display for MonthPeriod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

// ─── Year ────────────────────────────────────────────────────────────────────

/// A calendar year; payroll is filtered on `pay_period_start` within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPeriod(pub i32);

impl YearPeriod {
  pub fn first_day(&self) -> NaiveDate {
    NaiveDate::from_ymd_opt(self.0, 1, 1).unwrap_or(NaiveDate::MIN)
  }

  pub fn last_day(&self) -> NaiveDate {
    NaiveDate::from_ymd_opt(self.0, 12, 31).unwrap_or(NaiveDate::MAX)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  #[test]
  fn leap_february_ends_on_the_29th() {
    let feb: MonthPeriod = "2024-02".parse().unwrap();
    assert_eq!(feb.first_day(), date("2024-02-01"));
    assert_eq!(feb.last_day(), date("2024-02-29"));
    assert!(feb.contains(date("2024-02-29")));
    assert!(!feb.contains(date("2024-03-01")));
  }

  #[test]
  fn common_february_ends_on_the_28th() {
    let feb: MonthPeriod = "2023-02".parse().unwrap();
    assert_eq!(feb.last_day(), date("2023-02-28"));
  }

  #[test]
  fn thirty_day_months() {
    for m in ["2024-04", "2024-06", "2024-09", "2024-11"] {
      let month: MonthPeriod = m.parse().unwrap();
      assert_eq!(month.last_day().format("%d").to_string(), "30", "{m}");
    }
  }

  #[test]
  fn december_rolls_into_next_year() {
    let dec: MonthPeriod = "2024-12".parse().unwrap();
    assert_eq!(dec.last_day(), date("2024-12-31"));
  }

  #[test]
  fn rejects_malformed_months() {
    for bad in ["2024", "2024-13", "2024-00", "24-02", "2024-1x", ""] {
      assert!(bad.parse::<MonthPeriod>().is_err(), "{bad:?} should fail");
    }
  }

  #[test]
  fn single_digit_month_is_accepted_and_normalised() {
    let m: MonthPeriod = "2024-3".parse().unwrap();
    assert_eq!(m.to_string(), "2024-03");
  }

  #[test]
  fn year_bounds() {
    let y = YearPeriod(2025);
    assert_eq!(format_date(y.first_day()), "2025-01-01");
    assert_eq!(format_date(y.last_day()), "2025-12-31");
  }

  #[test]
  fn parse_date_rejects_garbage() {
    assert!(parse_date("2024-02-30").is_err());
    assert!(parse_date("tomorrow").is_err());
  }
}
