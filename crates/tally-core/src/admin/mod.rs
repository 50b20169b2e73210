//! Administrative allow-list.

pub mod registry;

pub use registry::{AdminRegistry, UserId};
