//! The expense record — the only entity Kakeibo stores.
//!
//! An expense is keyed by a generated string id and carries a calendar date
//! that the store indexes for ordered and ranged scans. Writes are whole-record
//! replacements; there is no partial update and no history.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Separator used inside the `tags` column.
pub const TAG_DELIMITER: char = ';';

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single tracked spending event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
  /// Primary key. Generated once at creation and never changed.
  pub id:         String,
  pub date:       NaiveDate,
  /// Whole yen; there is no fractional subunit.
  pub amount_jpy: i64,
  /// One of the caller's categories; the store accepts any string.
  pub category:   String,
  /// `;`-joined tag labels, or empty.
  pub tags:       String,
  pub memo:       String,
  /// Set by the caller on every create or update.
  pub updated_at: DateTime<Utc>,
}

impl Expense {
  /// Reject records the store must not accept.
  ///
  /// The date is already typed, but it must still fit the four-digit
  /// `YYYY-MM-DD` column form so that index order stays chronological.
  pub fn validate(&self) -> Result<()> {
    if self.id.is_empty() {
      return Err(Error::EmptyId);
    }
    if self.id.trim() != self.id {
      return Err(Error::PaddedId(self.id.clone()));
    }
    if !(0..=9999).contains(&self.date.year()) {
      return Err(Error::InvalidDate(self.date.to_string()));
    }
    if !self.tags.is_empty()
      && self.tags.split(TAG_DELIMITER).any(|t| t.trim().is_empty())
    {
      return Err(Error::EmptyTag(self.tags.clone()));
    }
    Ok(())
  }

  /// The individual tag labels, in stored order.
  pub fn tag_list(&self) -> Vec<&str> { split_tags(&self.tags) }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The fields a user fills in; the id and timestamp are assigned on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
  pub date:       NaiveDate,
  pub amount_jpy: i64,
  pub category:   String,
  pub tags:       Vec<String>,
  pub memo:       String,
}

impl ExpenseDraft {
  /// Build a brand-new record with a fresh UUID v4 id.
  pub fn create(self) -> Expense {
    self.into_expense(Uuid::new_v4().to_string(), now())
  }

  /// Build the replacement for an existing record, keeping its id.
  pub fn update(self, id: impl Into<String>) -> Expense {
    self.into_expense(id.into(), now())
  }

  pub fn into_expense(self, id: String, updated_at: DateTime<Utc>) -> Expense {
    Expense {
      id,
      date: self.date,
      amount_jpy: self.amount_jpy,
      category: self.category,
      tags: join_tags(&self.tags),
      memo: self.memo.trim().to_owned(),
      updated_at,
    }
  }
}

/// Current time, truncated to the millisecond precision records carry.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }

impl From<&Expense> for ExpenseDraft {
  fn from(e: &Expense) -> Self {
    Self {
      date:       e.date,
      amount_jpy: e.amount_jpy,
      category:   e.category.clone(),
      tags:       e.tag_list().into_iter().map(str::to_owned).collect(),
      memo:       e.memo.clone(),
    }
  }
}

// ─── Date range ──────────────────────────────────────────────────────────────

/// An inclusive `[start, end]` pair of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  start: NaiveDate,
  end:   NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvertedRange { start, end });
    }
    Ok(Self { start, end })
  }

  /// Parse both bounds from `YYYY-MM-DD` strings.
  pub fn parse(start: &str, end: &str) -> Result<Self> {
    Self::new(parse_date(start)?, parse_date(end)?)
  }

  pub fn start(&self) -> NaiveDate { self.start }

  pub fn end(&self) -> NaiveDate { self.end }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

// ─── Text forms ──────────────────────────────────────────────────────────────

/// Parse a strict `YYYY-MM-DD` date: four-digit year, zero-padded month and
/// day, and a real calendar day.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  let bytes = s.as_bytes();
  let shaped = bytes.len() == 10
    && bytes.iter().enumerate().all(|(i, b)| match i {
      4 | 7 => *b == b'-',
      _ => b.is_ascii_digit(),
    });
  if !shaped {
    return Err(Error::InvalidDate(s.to_owned()));
  }
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

/// RFC 3339 in UTC with a `Z` suffix; fractional seconds only when present,
/// which for drafted records is at most milliseconds.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// Split a stored tag string. The empty string has no tags.
pub fn split_tags(tags: &str) -> Vec<&str> {
  if tags.is_empty() {
    return Vec::new();
  }
  tags.split(TAG_DELIMITER).collect()
}

/// Join labels for storage, dropping blanks and repeats.
pub fn join_tags<S: AsRef<str>>(labels: &[S]) -> String {
  let mut seen: Vec<&str> = Vec::new();
  for label in labels.iter().map(|l| l.as_ref().trim()) {
    if !label.is_empty() && !seen.contains(&label) {
      seen.push(label);
    }
  }
  seen.join(";")
}

/// `個人;仕事` → `#個人 #仕事`.
pub fn display_tags(tags: &str) -> String {
  split_tags(tags)
    .iter()
    .map(|t| format!("#{t}"))
    .collect::<Vec<_>>()
    .join(" ")
}
