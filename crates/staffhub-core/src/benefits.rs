//! Government IDs, HMO enrolment and payroll bank account.

use serde::{Deserialize, Serialize};

/// The single benefits row for an employee. An employee without a row is
/// shown [`Benefits::default`], every field blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefits {
  pub employee_id:           String,
  pub sss_number:            String,
  pub philhealth_number:     String,
  pub pagibig_number:        String,
  pub tin_number:            String,
  pub hmo_provider:          String,
  pub hmo_plan:              String,
  pub hmo_card_number:       String,
  pub hmo_dependents:        u32,
  pub life_insurance_policy: String,
  pub bank_name:             String,
  pub bank_account:          String,
}
