//! Employee identity and HR profile.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One row of the employees app.
///
/// `employee_id` is the HR-assigned employee code; every other record type
/// refers to an employee through it. `id` is the store's record id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  pub id:                 u64,
  pub revision:           u64,
  pub employee_id:        String,
  pub email:              String,
  pub first_name:         String,
  pub last_name:          String,
  pub middle_name:        String,
  pub department:         String,
  pub position:           String,
  pub employment_status:  String,
  pub date_hired:         String,
  pub birth_date:         String,
  pub contact_number:     String,
  pub address:            String,
  pub emergency_contact:  String,
  pub emergency_number:   String,
  #[serde(skip_serializing, default)]
  pub password_hash:      String,
  pub is_verified:        bool,
  #[serde(skip_serializing, default)]
  pub verification_token: String,
}

impl Employee {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// An account can log in only once it is verified and has a password.
  pub fn is_activated(&self) -> bool {
    self.is_verified && !self.password_hash.is_empty()
  }

  /// Compare a caller-supplied verification token against the stored one.
  /// An empty stored token never matches.
  pub fn verification_token_matches(&self, token: &str) -> bool {
    !self.verification_token.is_empty() && self.verification_token == token
  }
}

/// Self-service profile edit. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
  pub contact_number:    Option<String>,
  pub address:           Option<String>,
  pub emergency_contact: Option<String>,
  pub emergency_number:  Option<String>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool {
    self.contact_number.is_none()
      && self.address.is_none()
      && self.emergency_contact.is_none()
      && self.emergency_number.is_none()
  }
}

/// Canonical form used for every email lookup.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Light structural check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<()> {
  let malformed = || Error::invalid("Please enter a valid email address");
  let (local, domain) = email.split_once('@').ok_or_else(malformed)?;
  if local.is_empty()
    || domain.contains('@')
    || email.chars().any(char::is_whitespace)
  {
    return Err(malformed());
  }
  match domain.split_once('.') {
    Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.ends_with('.') => Ok(()),
    _ => Err(malformed()),
  }
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_password(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::invalid(format!(
      "Password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_is_trimmed_and_lowercased() {
    assert_eq!(normalize_email("  Juan.Cruz@Example.COM "), "juan.cruz@example.com");
  }

  #[test]
  fn accepts_ordinary_addresses() {
    for ok in ["a@b.co", "juan.dela.cruz@corp.example.ph"] {
      assert!(validate_email(ok).is_ok(), "{ok}");
    }
  }

  #[test]
  fn rejects_malformed_addresses() {
    for bad in ["", "plain", "@example.com", "a@b", "a@@b.com", "a@b.", "a b@c.com", "a@.com"] {
      assert!(validate_email(bad).is_err(), "{bad:?}");
    }
  }

  #[test]
  fn short_passwords_are_rejected() {
    assert!(validate_password("1234567").is_err());
    assert!(validate_password("12345678").is_ok());
  }

  #[test]
  fn empty_stored_token_never_matches() {
    let e = Employee::default();
    assert!(!e.verification_token_matches(""));
    let e = Employee { verification_token: "abc".into(), ..Default::default() };
    assert!(e.verification_token_matches("abc"));
    assert!(!e.verification_token_matches("abd"));
  }

  #[test]
  fn secrets_are_not_serialised() {
    let e = Employee {
      password_hash: "$argon2id$...".into(),
      verification_token: "tok".into(),
      ..Default::default()
    };
    let json = serde_json::to_value(&e).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("verificationToken").is_none());
    assert_eq!(json["isVerified"], false);
  }
}
