//! Kintone's field-wrapper record shape.
//!
//! Every field arrives as `{"type": "...", "value": ...}`. The accessors here
//! are total: a missing field, a `null` value or an unparsable number yields
//! the type's empty value rather than an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field as Kintone returns it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Field {
  #[serde(rename = "type", default)]
  pub kind:  Option<String>,
  #[serde(default)]
  pub value: Value,
}

/// A raw record: field code → field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Field>);

impl Record {
  pub fn field(&self, code: &str) -> Option<&Field> { self.0.get(code) }

  /// The `$id` system field.
  pub fn id(&self) -> u64 { self.unsigned("$id") }

  /// The `$revision` system field.
  pub fn revision(&self) -> u64 { self.unsigned("$revision") }

  /// Field value as text. Multi-value fields (check boxes, user pickers) are
  /// joined with `", "`.
  pub fn text(&self, code: &str) -> String {
    self.field(code).map(|f| value_text(&f.value)).unwrap_or_default()
  }

  /// Text, or `default` when blank.
  pub fn text_or(&self, code: &str, default: &str) -> String {
    let text = self.text(code);
    if text.trim().is_empty() { default.to_owned() } else { text }
  }

  /// Decimal value; `0.0` when absent or unparsable.
  pub fn number(&self, code: &str) -> f64 {
    self.text(code).trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
  }

  /// Integer value, truncating decimals; `default` when absent or
  /// unparsable.
  pub fn integer_or(&self, code: &str, default: i64) -> i64 {
    let text = self.text(code);
    let text = text.trim();
    text
      .parse::<i64>()
      .ok()
      .or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
      .unwrap_or(default)
  }

  pub fn integer(&self, code: &str) -> i64 { self.integer_or(code, 0) }

  /// `"Yes"` flag. Check-box fields match when `"Yes"` is among the
  /// selected options.
  pub fn flag(&self, code: &str) -> bool {
    match self.field(code).map(|f| &f.value) {
      Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("yes"),
      Some(Value::Array(items)) => items
        .iter()
        .any(|v| v.as_str().is_some_and(|s| s.trim().eq_ignore_ascii_case("yes"))),
      Some(Value::Bool(b)) => *b,
      _ => false,
    }
  }

  fn unsigned(&self, code: &str) -> u64 { u64::try_from(self.integer(code)).unwrap_or(0) }
}

impl<const N: usize> From<[(&str, Value); N]> for Record {
  fn from(fields: [(&str, Value); N]) -> Self {
    Self(
      fields
        .into_iter()
        .map(|(code, value)| (code.to_owned(), Field { kind: None, value }))
        .collect(),
    )
  }
}

fn value_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => b.to_string(),
    Value::Array(items) => items
      .iter()
      .map(value_text)
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(", "),
    // User and organisation pickers carry `{code, name}` entries.
    Value::Object(obj) => obj
      .get("name")
      .or_else(|| obj.get("code"))
      .map(value_text)
      .unwrap_or_default(),
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Builder for a write body's `record` member: `{code: {"value": ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(Map<String, Value>);

impl FieldMap {
  pub fn new() -> Self { Self::default() }

  pub fn set(mut self, code: &str, value: impl Into<String>) -> Self {
    self.0.insert(code.to_owned(), serde_json::json!({ "value": value.into() }));
    self
  }

  /// Set only when `value` is present.
  pub fn set_opt(self, code: &str, value: Option<impl Into<String>>) -> Self {
    match value {
      Some(v) => self.set(code, v),
      None => self,
    }
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn get(&self, code: &str) -> Option<&str> {
    self.0.get(code).and_then(|f| f.get("value")).and_then(Value::as_str)
  }
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// One page of a `records.json` read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsPage {
  pub records:     Vec<Record>,
  /// Present only when the total count was requested.
  pub total_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRecordsPage {
  #[serde(default)]
  pub records:     Vec<Record>,
  #[serde(default)]
  pub total_count: Option<Value>,
}

impl From<RawRecordsPage> for RecordsPage {
  fn from(raw: RawRecordsPage) -> Self {
    let total_count = raw.total_count.and_then(|v| match v {
      Value::String(s) => s.trim().parse().ok(),
      Value::Number(n) => n.as_u64(),
      _ => None,
    });
    Self { records: raw.records, total_count }
  }
}

#[derive(Deserialize)]
pub(crate) struct RawRecord {
  pub record: Record,
}

/// Id and revision assigned to a newly added record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created {
  pub id:       u64,
  pub revision: u64,
}

#[derive(Deserialize)]
pub(crate) struct RawCreated {
  pub id:       String,
  pub revision: String,
}

#[derive(Deserialize)]
pub(crate) struct RawUpdated {
  pub revision: String,
}
