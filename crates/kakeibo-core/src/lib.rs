//! Core types and trait definitions for the Kakeibo expense tracker.
//!
//! This crate is deliberately free of database and I/O dependencies. The
//! store backend, the CSV exporter and the CLI all depend on it.

pub mod error;
pub mod expense;
pub mod store;
pub mod vocab;

pub use error::{Error, Result};
