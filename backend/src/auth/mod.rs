//! Authentication module
//!
//! Static bearer-token authentication for backup and restore.

mod middleware;

pub use middleware::BackupAuth;
