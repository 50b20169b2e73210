//! Monitored groups.
//!
//! A group is identified by the platform's numeric chat id and carries the
//! display name last observed for it.

pub mod model;
pub mod registry;

pub use model::GroupId;
pub use registry::GroupRegistry;
