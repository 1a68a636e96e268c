//! Business logic services
//!
//! Services validate input through the engine and coordinate repositories.

pub mod backup;
pub mod coach;
pub mod export;
pub mod logs;

pub use backup::BackupService;
pub use coach::CoachService;
pub use export::ExportService;
pub use logs::LogService;
