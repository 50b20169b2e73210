//! Message records and the partitioned ledger that owns them.

pub mod ledger;
pub mod model;

pub use ledger::MessageLedger;
pub use model::MessageRecord;
