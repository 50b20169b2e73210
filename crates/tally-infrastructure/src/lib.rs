pub mod config_loader;
pub mod file_ledger_repository;
pub mod paths;
pub mod storage;

pub use crate::config_loader::load_config;
pub use crate::file_ledger_repository::FileLedgerRepository;
pub use crate::paths::TallyPaths;
