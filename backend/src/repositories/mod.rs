//! Database repositories
//!
//! Data access for day logs, settings documents and backups.

pub mod backups;
pub mod logs;
pub mod settings;

pub use backups::{BackupRecord, BackupRepository};
pub use logs::{DayLogRecord, DayLogRepository};
pub use settings::SettingsRepository;
