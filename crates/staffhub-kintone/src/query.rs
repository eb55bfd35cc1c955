//! Kintone query language builder.
//!
//! Field codes are compile-time constants; only values come from callers,
//! and every value is rendered as an escaped string literal.

use std::fmt;

use chrono::NaiveDate;
use staffhub_core::period::{MonthPeriod, YearPeriod, format_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Eq,
  Ne,
  Gte,
  Lte,
}

impl Op {
  fn as_str(self) -> &'static str {
    match self {
      Self::Eq => "=",
      Self::Ne => "!=",
      Self::Gte => ">=",
      Self::Lte => "<=",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
  Asc,
  Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
  Compare { field: &'static str, op: Op, value: String },
  In { field: &'static str, values: Vec<String> },
}

/// A `records.json` query: `and`-joined conditions, ordering and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
  conditions: Vec<Condition>,
  order:      Vec<(&'static str, Order)>,
  limit:      Option<usize>,
  offset:     Option<usize>,
}

impl Query {
  pub fn new() -> Self { Self::default() }

  pub fn compare(mut self, field: &'static str, op: Op, value: impl Into<String>) -> Self {
    self.conditions.push(Condition::Compare { field, op, value: value.into() });
    self
  }

  pub fn eq(self, field: &'static str, value: impl Into<String>) -> Self {
    self.compare(field, Op::Eq, value)
  }

  pub fn ne(self, field: &'static str, value: impl Into<String>) -> Self {
    self.compare(field, Op::Ne, value)
  }

  pub fn gte(self, field: &'static str, value: impl Into<String>) -> Self {
    self.compare(field, Op::Gte, value)
  }

  pub fn lte(self, field: &'static str, value: impl Into<String>) -> Self {
    self.compare(field, Op::Lte, value)
  }

  pub fn any_of<I, V>(mut self, field: &'static str, values: I) -> Self
  where
    I: IntoIterator<Item = V>,
    V: Into<String>,
  {
    self.conditions.push(Condition::In { field, values: values.into_iter().map(Into::into).collect() });
    self
  }

  pub fn on(self, field: &'static str, date: NaiveDate) -> Self { self.eq(field, format_date(date)) }

  /// Inclusive date range.
  pub fn between(self, field: &'static str, from: NaiveDate, to: NaiveDate) -> Self {
    self.gte(field, format_date(from)).lte(field, format_date(to))
  }

  pub fn in_month(self, field: &'static str, month: MonthPeriod) -> Self {
    self.between(field, month.first_day(), month.last_day())
  }

  pub fn in_year(self, field: &'static str, year: YearPeriod) -> Self {
    self.between(field, year.first_day(), year.last_day())
  }

  pub fn order_by(mut self, field: &'static str, order: Order) -> Self {
    self.order.push((field, order));
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn offset(mut self, offset: usize) -> Self {
    self.offset = Some(offset);
    self
  }

  pub fn page_limit(&self) -> Option<usize> { self.limit }

  pub fn page_offset(&self) -> usize { self.offset.unwrap_or(0) }
}

/// Double-quote `value`, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    if matches!(c, '\\' | '"') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  out
}

impl fmt::Display for Query {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts: Vec<String> = Vec::new();

    let conditions: Vec<String> = self
      .conditions
      .iter()
      .map(|c| match c {
        Condition::Compare { field, op, value } => format!("{field} {} {}", op.as_str(), quote(value)),
        Condition::In { field, values } => {
          let list: Vec<String> = values.iter().map(|v| quote(v)).collect();
          format!("{field} in ({})", list.join(", "))
        }
      })
      .collect();
    if !conditions.is_empty() {
      parts.push(conditions.join(" and "));
    }

    if !self.order.is_empty() {
      let order: Vec<String> = self
        .order
        .iter()
        .map(|(field, o)| format!("{field} {}", if *o == Order::Asc { "asc" } else { "desc" }))
        .collect();
      parts.push(format!("order by {}", order.join(", ")));
    }
    if let Some(limit) = self.limit {
      parts.push(format!("limit {limit}"));
    }
    if let Some(offset) = self.offset {
      parts.push(format!("offset {offset}"));
    }

    f.write_str(&parts.join(" "))
  }
}
