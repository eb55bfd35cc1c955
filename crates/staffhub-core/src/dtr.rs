//! Daily Time Record: attendance rows and the clock state machine.
//!
//! Only times of day are stored (`HH:MM`), so all arithmetic assumes the shift
//! starts and ends on the same calendar day. A shift crossing midnight yields
//! zero hours.
//!
//! ```text
//! NotClockedIn ──in──▶ ClockedIn ──out──▶ ClockedOut
//!                       │    ▲
//!                lunch_out  lunch_in
//!                       ▼    │
//!                      OnLunch
//! ```

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Error, Result};

/// Hours in a regular workday; anything beyond is overtime.
pub const STANDARD_WORKDAY_HOURS: f64 = 8.0;

/// Wire format of the time-of-day fields.
pub const TIME_FORMAT: &str = "%H:%M";

/// Status written on clock-in.
pub const STATUS_PRESENT: &str = "Present";

// ─── Record ──────────────────────────────────────────────────────────────────

/// One employee's attendance for one calendar day.
///
/// Empty strings mean "not yet recorded".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtrRecord {
  pub id:             u64,
  pub revision:       u64,
  pub employee_id:    String,
  pub employee_name:  String,
  pub date:           String,
  pub time_in:        String,
  pub time_out:       String,
  pub lunch_out:      String,
  pub lunch_in:       String,
  pub total_hours:    f64,
  pub overtime_hours: f64,
  pub late_minutes:   i64,
  pub status:         String,
  pub remarks:        String,
}

/// Fields of a freshly created record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDtrRecord {
  pub employee_id:   String,
  pub employee_name: String,
  pub date:          NaiveDate,
  pub time_in:       String,
  pub status:        String,
  pub remarks:       String,
}

/// A partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DtrUpdate {
  pub time_in:        Option<String>,
  pub time_out:       Option<String>,
  pub lunch_out:      Option<String>,
  pub lunch_in:       Option<String>,
  pub total_hours:    Option<f64>,
  pub overtime_hours: Option<f64>,
  pub status:         Option<String>,
  pub remarks:        Option<String>,
}

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
  In,
  LunchOut,
  LunchIn,
  Out,
}

impl ClockAction {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::In => "in",
      Self::LunchOut => "lunch_out",
      Self::LunchIn => "lunch_in",
      Self::Out => "out",
    }
  }
}

impl FromStr for ClockAction {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "in" => Ok(Self::In),
      "lunch_out" => Ok(Self::LunchOut),
      "lunch_in" => Ok(Self::LunchIn),
      "out" => Ok(Self::Out),
      _ => Err(Error::invalid("Invalid action")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
  NotClockedIn,
  ClockedIn,
  OnLunch,
  ClockedOut,
}

impl ClockState {
  /// Derive the state from today's record, if any.
  pub fn of(record: Option<&DtrRecord>) -> Self {
    let Some(r) = record else { return Self::NotClockedIn };
    if r.time_in.is_empty() {
      Self::NotClockedIn
    } else if !r.time_out.is_empty() {
      Self::ClockedOut
    } else if !r.lunch_out.is_empty() && r.lunch_in.is_empty() {
      Self::OnLunch
    } else {
      Self::ClockedIn
    }
  }
}

/// A clock action that is not valid from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockRejection {
  #[error("Already clocked in today")]
  AlreadyClockedIn,
  #[error("No clock-in record found")]
  NotClockedIn,
  #[error("Already clocked out today")]
  AlreadyClockedOut,
  #[error("Already on lunch break")]
  AlreadyOnLunch,
  #[error("Lunch break already taken today")]
  LunchAlreadyTaken,
  #[error("Not on lunch break")]
  NotOnLunch,
  #[error("End your lunch break before clocking out")]
  StillOnLunch,
}

/// Who is clocking, from where, and when.
#[derive(Debug, Clone, Copy)]
pub struct ClockContext<'a> {
  pub employee_id:   &'a str,
  pub employee_name: &'a str,
  pub location:      Option<&'a str>,
  pub now:           NaiveDateTime,
}

/// The store write a valid clock action translates into.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockPlan {
  Create(NewDtrRecord),
  Update {
    record_id: u64,
    revision:  u64,
    changes:   DtrUpdate,
  },
}

/// Decide what to write for `action`, given the freshly fetched record for
/// `ctx.now`'s date.
pub fn plan(
  action: ClockAction,
  today: Option<&DtrRecord>,
  ctx: ClockContext<'_>,
) -> Result<ClockPlan> {
  let now = format_clock_time(ctx.now.time());
  let state = ClockState::of(today);

  let update = |changes: DtrUpdate| -> Result<ClockPlan> {
    let r = today.ok_or(ClockRejection::NotClockedIn)?;
    Ok(ClockPlan::Update { record_id: r.id, revision: r.revision, changes })
  };

  match (action, state) {
    (ClockAction::In, ClockState::NotClockedIn) => {
      let remarks = ctx
        .location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("Location: {l}"))
        .unwrap_or_default();
      match today {
        // A placeholder row for today already exists; fill it in rather than
        // inserting a second one.
        Some(_) => update(DtrUpdate {
          time_in: Some(now),
          status: Some(STATUS_PRESENT.to_owned()),
          remarks: Some(remarks),
          ..Default::default()
        }),
        None => Ok(ClockPlan::Create(NewDtrRecord {
          employee_id: ctx.employee_id.to_owned(),
          employee_name: ctx.employee_name.to_owned(),
          date: ctx.now.date(),
          time_in: now,
          status: STATUS_PRESENT.to_owned(),
          remarks,
        })),
      }
    }
    (ClockAction::In, _) => Err(ClockRejection::AlreadyClockedIn.into()),

    (_, ClockState::NotClockedIn) => Err(ClockRejection::NotClockedIn.into()),
    (_, ClockState::ClockedOut) => Err(ClockRejection::AlreadyClockedOut.into()),

    (ClockAction::LunchOut, ClockState::OnLunch) => Err(ClockRejection::AlreadyOnLunch.into()),
    (ClockAction::LunchOut, ClockState::ClockedIn) => {
      let r = today.ok_or(ClockRejection::NotClockedIn)?;
      if !r.lunch_in.is_empty() {
        return Err(ClockRejection::LunchAlreadyTaken.into());
      }
      update(DtrUpdate { lunch_out: Some(now), ..Default::default() })
    }

    (ClockAction::LunchIn, ClockState::OnLunch) => {
      update(DtrUpdate { lunch_in: Some(now), ..Default::default() })
    }
    (ClockAction::LunchIn, ClockState::ClockedIn) => Err(ClockRejection::NotOnLunch.into()),

    (ClockAction::Out, ClockState::OnLunch) => Err(ClockRejection::StillOnLunch.into()),
    (ClockAction::Out, ClockState::ClockedIn) => {
      let r = today.ok_or(ClockRejection::NotClockedIn)?;
      let time_in = parse_clock_time(&r.time_in)?;
      let lunch = match (r.lunch_out.is_empty(), r.lunch_in.is_empty()) {
        (false, false) => Some((parse_clock_time(&r.lunch_out)?, parse_clock_time(&r.lunch_in)?)),
        _ => None,
      };
      let hours = worked_hours(time_in, ctx.now.time(), lunch);
      update(DtrUpdate {
        time_out: Some(now),
        total_hours: Some(hours.total),
        overtime_hours: Some(hours.overtime),
        ..Default::default()
      })
    }
  }
}

// ─── Arithmetic ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkedHours {
  pub total:    f64,
  pub overtime: f64,
}

/// Hours between `time_in` and `time_out` minus the lunch break, floored at
/// zero. Times are truncated to the minute, matching what is stored.
pub fn worked_hours(
  time_in: NaiveTime,
  time_out: NaiveTime,
  lunch: Option<(NaiveTime, NaiveTime)>,
) -> WorkedHours {
  let minutes = |a: NaiveTime, b: NaiveTime| {
    (truncate_to_minute(b) - truncate_to_minute(a)).num_minutes() as f64
  };
  let mut worked = minutes(time_in, time_out);
  if let Some((out, back)) = lunch {
    worked -= minutes(out, back).max(0.0);
  }
  let total = (worked / 60.0).max(0.0);
  WorkedHours {
    total,
    overtime: (total - STANDARD_WORKDAY_HOURS).max(0.0),
  }
}

/// Parse `HH:MM`, tolerating a trailing `:SS`.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime> {
  let s = s.trim();
  NaiveTime::parse_from_str(s, TIME_FORMAT)
    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    .map_err(|_| Error::InvalidTime(s.to_owned()))
}

pub fn format_clock_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

/// Stored representation of hour values.
pub fn format_hours(hours: f64) -> String { format!("{hours:.2}") }

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
  t.with_second(0)
    .and_then(|t| t.with_nanosecond(0))
    .unwrap_or(t)
}

// ─── Today view ──────────────────────────────────────────────────────────────

/// What the clock widget shows for today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStatus {
  pub is_clocked_in: bool,
  pub is_on_lunch:   bool,
  pub time_in:       Option<String>,
  pub time_out:      Option<String>,
  pub lunch_out:     Option<String>,
  pub lunch_in:      Option<String>,
}

impl TodayStatus {
  pub fn of(record: Option<&DtrRecord>) -> Self {
    let Some(r) = record else { return Self::default() };
    let present = |s: &str| (!s.is_empty()).then(|| s.to_owned());
    Self {
      is_clocked_in: !r.time_in.is_empty() && r.time_out.is_empty(),
      is_on_lunch:   !r.lunch_out.is_empty() && r.lunch_in.is_empty(),
      time_in:       present(&r.time_in),
      time_out:      present(&r.time_out),
      lunch_out:     present(&r.lunch_out),
      lunch_in:      present(&r.lunch_in),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(s: &str) -> NaiveTime { parse_clock_time(s).unwrap() }

  fn at(hm: &str) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_time(t(hm))
  }

  fn ctx(hm: &str) -> ClockContext<'static> {
    ClockContext {
      employee_id:   "EMP-7",
      employee_name: "Jose Rizal",
      location:      None,
      now:           at(hm),
    }
  }

  fn record(time_in: &str, lunch_out: &str, lunch_in: &str, time_out: &str) -> DtrRecord {
    DtrRecord {
      id: 41,
      revision: 3,
      employee_id: "EMP-7".into(),
      date: "2024-03-04".into(),
      time_in: time_in.into(),
      lunch_out: lunch_out.into(),
      lunch_in: lunch_in.into(),
      time_out: time_out.into(),
      status: STATUS_PRESENT.into(),
      ..Default::default()
    }
  }

  fn changes(plan: ClockPlan) -> DtrUpdate {
    match plan {
      ClockPlan::Update { changes, .. } => changes,
      other => panic!("expected update, got {other:?}"),
    }
  }

  // ── Arithmetic ──────────────────────────────────────────────────────────

  #[test]
  fn full_day_with_lunch_is_eight_hours() {
    let h = worked_hours(t("08:00"), t("17:00"), Some((t("12:00"), t("13:00"))));
    assert_eq!(h.total, 8.0);
    assert_eq!(h.overtime, 0.0);
  }

  #[test]
  fn ten_hours_without_lunch_is_two_overtime() {
    let h = worked_hours(t("08:00"), t("18:00"), None);
    assert_eq!(h.total, 10.0);
    assert_eq!(h.overtime, 2.0);
  }

  #[test]
  fn negative_span_floors_at_zero() {
    let h = worked_hours(t("22:00"), t("06:00"), None);
    assert_eq!(h.total, 0.0);
    assert_eq!(h.overtime, 0.0);
  }

  #[test]
  fn seconds_are_ignored() {
    let h = worked_hours(t("08:00:59"), t("08:30:01"), None);
    assert_eq!(h.total, 0.5);
  }

  #[test]
  fn hours_are_stored_with_two_decimals() {
    assert_eq!(format_hours(7.0 + 1.0 / 3.0), "7.33");
    assert_eq!(format_hours(0.0), "0.00");
  }

  // ── Transitions ─────────────────────────────────────────────────────────

  #[test]
  fn clock_in_creates_present_record() {
    let mut c = ctx("08:02");
    c.location = Some("14.55,121.02");
    match plan(ClockAction::In, None, c).unwrap() {
      ClockPlan::Create(new) => {
        assert_eq!(new.time_in, "08:02");
        assert_eq!(new.status, STATUS_PRESENT);
        assert_eq!(new.remarks, "Location: 14.55,121.02");
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
      }
      other => panic!("expected create, got {other:?}"),
    }
  }

  #[test]
  fn clock_in_fills_placeholder_row_instead_of_inserting() {
    let placeholder = record("", "", "", "");
    let plan = plan(ClockAction::In, Some(&placeholder), ctx("08:00")).unwrap();
    assert!(matches!(plan, ClockPlan::Update { record_id: 41, revision: 3, .. }));
  }

  #[test]
  fn double_clock_in_is_rejected() {
    let r = record("08:00", "", "", "");
    let err = plan(ClockAction::In, Some(&r), ctx("09:00")).unwrap_err();
    assert_eq!(err, Error::Clock(ClockRejection::AlreadyClockedIn));
  }

  #[test]
  fn clock_out_without_clock_in_is_rejected() {
    let err = plan(ClockAction::Out, None, ctx("17:00")).unwrap_err();
    assert_eq!(err, Error::Clock(ClockRejection::NotClockedIn));
  }

  #[test]
  fn clock_out_twice_is_rejected() {
    let r = record("08:00", "", "", "17:00");
    let err = plan(ClockAction::Out, Some(&r), ctx("17:05")).unwrap_err();
    assert_eq!(err, Error::Clock(ClockRejection::AlreadyClockedOut));
  }

  #[test]
  fn clock_out_subtracts_lunch() {
    let r = record("08:00", "12:00", "13:00", "");
    let c = changes(plan(ClockAction::Out, Some(&r), ctx("17:00")).unwrap());
    assert_eq!(c.time_out.as_deref(), Some("17:00"));
    assert_eq!(c.total_hours, Some(8.0));
    assert_eq!(c.overtime_hours, Some(0.0));
  }

  #[test]
  fn clock_out_while_on_lunch_is_rejected() {
    let r = record("08:00", "12:00", "", "");
    let err = plan(ClockAction::Out, Some(&r), ctx("13:00")).unwrap_err();
    assert_eq!(err, Error::Clock(ClockRejection::StillOnLunch));
  }

  #[test]
  fn lunch_in_before_lunch_out_is_rejected() {
    let r = record("08:00", "", "", "");
    let err = plan(ClockAction::LunchIn, Some(&r), ctx("12:00")).unwrap_err();
    assert_eq!(err, Error::Clock(ClockRejection::NotOnLunch));
  }

  #[test]
  fn second_lunch_is_rejected() {
    let r = record("08:00", "12:00", "13:00", "");
    let err = plan(ClockAction::LunchOut, Some(&r), ctx("15:00")).unwrap_err();
    assert_eq!(err, Error::Clock(ClockRejection::LunchAlreadyTaken));
  }

  #[test]
  fn lunch_round_trip() {
    let r = record("08:00", "", "", "");
    let out = changes(plan(ClockAction::LunchOut, Some(&r), ctx("12:01")).unwrap());
    assert_eq!(out.lunch_out.as_deref(), Some("12:01"));

    let r = record("08:00", "12:01", "", "");
    assert_eq!(ClockState::of(Some(&r)), ClockState::OnLunch);
    let back = changes(plan(ClockAction::LunchIn, Some(&r), ctx("12:58")).unwrap());
    assert_eq!(back.lunch_in.as_deref(), Some("12:58"));
  }

  #[test]
  fn update_plans_carry_the_fetched_revision() {
    let r = record("08:00", "", "", "");
    let plan = plan(ClockAction::Out, Some(&r), ctx("16:00")).unwrap();
    assert!(matches!(plan, ClockPlan::Update { record_id: 41, revision: 3, .. }));
  }

  #[test]
  fn unparseable_stored_time_is_an_error() {
    let r = record("8 o'clock", "", "", "");
    assert!(matches!(
      plan(ClockAction::Out, Some(&r), ctx("17:00")),
      Err(Error::InvalidTime(_))
    ));
  }

  #[test]
  fn action_names_match_the_wire() {
    let a: ClockAction = serde_json::from_str("\"lunch_out\"").unwrap();
    assert_eq!(a, ClockAction::LunchOut);
    let a: ClockAction = serde_json::from_str("\"in\"").unwrap();
    assert_eq!(a, ClockAction::In);
  }

  // ── Today view ──────────────────────────────────────────────────────────

  #[test]
  fn today_status_without_record_is_idle() {
    assert_eq!(TodayStatus::of(None), TodayStatus::default());
  }

  #[test]
  fn today_status_reports_lunch() {
    let r = record("08:00", "12:00", "", "");
    let s = TodayStatus::of(Some(&r));
    assert!(s.is_clocked_in);
    assert!(s.is_on_lunch);
    assert_eq!(s.time_in.as_deref(), Some("08:00"));
    assert_eq!(s.lunch_in, None);
  }

  #[test]
  fn actions_parse_from_wire_names() {
    assert_eq!("lunch_out".parse::<ClockAction>().unwrap(), ClockAction::LunchOut);
    assert_eq!(ClockAction::LunchIn.as_str(), "lunch_in");
    assert_eq!("nap".parse::<ClockAction>().unwrap_err().to_string(), "Invalid action");
  }
}
