//! Error types for `kakeibo-core`.

use chrono::NaiveDate;
use thiserror::Error;

/// A record or query bound that is structurally malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("expense id must not be empty")]
  EmptyId,

  #[error("expense id {0:?} has leading or trailing whitespace")]
  PaddedId(String),

  #[error("tags {0:?} contain an empty label")]
  EmptyTag(String),

  #[error("date range is inverted: {start} is after {end}")]
  InvertedRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
