//! Error type for `kakeibo-store-sqlite`.
//!
//! Engine failures are split by the operation that hit them, so callers can
//! tell a failed open from a failed write or read. "Not found" and "no rows"
//! are never errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to open expense database: {0}")]
  Initialization(#[source] tokio_rusqlite::Error),

  #[error("database schema version {found} is newer than supported version {supported}")]
  UnsupportedVersion { found: i64, supported: i64 },

  #[error("failed to write expense: {0}")]
  Write(#[source] tokio_rusqlite::Error),

  #[error("failed to read expenses: {0}")]
  Read(#[source] tokio_rusqlite::Error),

  /// Rejected before reaching the database.
  #[error("invalid expense: {0}")]
  Invalid(#[from] kakeibo_core::Error),

  /// A stored row could not be turned back into an expense.
  #[error("corrupt expense row {id:?}: {reason}")]
  Decode { id: String, reason: String },
}

impl Error {
  pub fn is_initialization(&self) -> bool {
    matches!(self, Self::Initialization(_) | Self::UnsupportedVersion { .. })
  }

  pub fn is_write(&self) -> bool { matches!(self, Self::Write(_)) }

  pub fn is_read(&self) -> bool {
    matches!(self, Self::Read(_) | Self::Decode { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
