//! Write-ahead journal of ledger and group-registry mutations.
//!
//! Every mutation that touches the group registry or the ledger is recorded
//! as one entry, so a registry change and its partition change are durable
//! together. Entries are replayed over the last snapshot documents on start.

pub mod model;
pub mod replay;

pub use model::JournalEntry;
pub use replay::{ReplayStats, apply, replay};
