//! Core domain of the Tally group message ledger.
//!
//! The ledger records who sent which message in every monitored group and
//! answers authorized range-count queries. Storage is abstracted behind
//! [`repository::LedgerRepository`]; `tally-infrastructure` provides the
//! file-backed implementation.

pub mod admin;
pub mod command;
pub mod config;
pub mod error;
pub mod group;
pub mod journal;
pub mod message;
pub mod query;
pub mod repository;
pub mod tracker;

#[cfg(test)]
mod testing;

// Re-export common types
pub use error::TallyError;
pub use tracker::{Tracker, TrackerOptions};
