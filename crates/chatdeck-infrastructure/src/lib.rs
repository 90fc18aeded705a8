pub mod config_service;
pub mod export_file;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::ChatPaths;
pub use crate::storage::FileHistorySlot;
