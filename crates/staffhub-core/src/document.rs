//! HR document requests (certificates of employment, payslip copies, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, employee::Employee};

/// Processing pipeline: Pending → Processing → Ready → Released.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
  #[default]
  Pending,
  Processing,
  Ready,
  Released,
  Other(String),
}

impl DocumentStatus {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Pending => "Pending",
      Self::Processing => "Processing",
      Self::Ready => "Ready",
      Self::Released => "Released",
      Self::Other(s) => s,
    }
  }
}

impl From<&str> for DocumentStatus {
  fn from(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "" | "pending" => Self::Pending,
      "processing" => Self::Processing,
      "ready" => Self::Ready,
      "released" => Self::Released,
      _ => Self::Other(s.to_owned()),
    }
  }
}

impl From<String> for DocumentStatus {
  fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl From<DocumentStatus> for String {
  fn from(s: DocumentStatus) -> Self { s.as_str().to_owned() }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
  pub id:            u64,
  pub employee_id:   String,
  pub employee_name: String,
  pub document_type: String,
  pub purpose:       String,
  pub quantity:      u32,
  pub status:        DocumentStatus,
  pub remarks:       String,
  pub release_date:  String,
  pub created_at:    String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentForm {
  #[serde(default)]
  pub document_type: String,
  #[serde(default)]
  pub purpose:       String,
  pub quantity:      Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocumentRequest {
  pub employee_id:   String,
  pub employee_name: String,
  pub document_type: String,
  pub purpose:       String,
  pub quantity:      u32,
  pub created_at:    NaiveDate,
}

impl DocumentForm {
  pub fn validate(self, employee: &Employee, today: NaiveDate) -> Result<NewDocumentRequest> {
    let document_type = self.document_type.trim();
    let purpose = self.purpose.trim();
    if document_type.is_empty() || purpose.is_empty() {
      return Err(Error::invalid("Document type and purpose are required"));
    }
    let quantity = self.quantity.filter(|q| *q > 0).unwrap_or(1);
    Ok(NewDocumentRequest {
      employee_id: employee.employee_id.clone(),
      employee_name: employee.full_name(),
      document_type: document_type.to_owned(),
      purpose: purpose.to_owned(),
      quantity,
      created_at: today,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() }

  #[test]
  fn quantity_defaults_to_one() {
    let form = DocumentForm {
      document_type: "Certificate of Employment".into(),
      purpose: "Visa application".into(),
      quantity: None,
    };
    let req = form.validate(&Employee::default(), today()).unwrap();
    assert_eq!(req.quantity, 1);
  }

  #[test]
  fn purpose_is_required() {
    let form = DocumentForm {
      document_type: "Certificate of Employment".into(),
      ..Default::default()
    };
    assert!(form.validate(&Employee::default(), today()).is_err());
  }

  #[test]
  fn status_round_trips_through_strings() {
    assert_eq!(DocumentStatus::from("READY"), DocumentStatus::Ready);
    assert_eq!(String::from(DocumentStatus::Released), "Released");
  }
}
