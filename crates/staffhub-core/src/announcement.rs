//! Company-wide announcements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::parse_date;

/// Maximum number of announcements shown at once.
pub const ANNOUNCEMENT_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
  pub id:           u64,
  pub title:        String,
  pub content:      String,
  pub category:     String,
  pub priority:     String,
  pub publish_date: String,
  pub expiry_date:  String,
  pub is_active:    bool,
}

impl Announcement {
  /// True once a parseable expiry date lies before `today`. A blank or
  /// malformed expiry never hides an announcement.
  pub fn is_expired_on(&self, today: NaiveDate) -> bool {
    parse_date(&self.expiry_date).is_ok_and(|expiry| expiry < today)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, 15).unwrap() }

  #[test]
  fn expiry_is_inclusive() {
    let a = Announcement { expiry_date: "2024-06-15".into(), ..Default::default() };
    assert!(!a.is_expired_on(today()));
    let a = Announcement { expiry_date: "2024-06-14".into(), ..Default::default() };
    assert!(a.is_expired_on(today()));
  }

  #[test]
  fn blank_expiry_never_expires() {
    assert!(!Announcement::default().is_expired_on(today()));
  }
}
