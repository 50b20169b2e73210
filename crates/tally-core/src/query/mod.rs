//! Range-count queries over the ledger.

pub mod engine;
pub mod range;

pub use engine::{CountQuery, count_messages};
pub use range::DateRange;
