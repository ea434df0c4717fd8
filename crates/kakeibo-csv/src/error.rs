//! Error types for the kakeibo-csv exporter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to query expenses: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
