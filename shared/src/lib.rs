//! Peso Coach engine
//!
//! Pure weight and body-fat trend computations shared by the backend and the
//! WASM bindings: series building, moving averages, checkpoint status, weekly
//! variation and the energy-balance projection.

pub mod checkpoints;
pub mod dates;
pub mod errors;
pub mod logs;
pub mod models;
pub mod moving_average;
pub mod projection;
pub mod series;
pub mod summary;
pub mod types;
pub mod validation;
pub mod variation;

// Re-export commonly used items
pub use checkpoints::{RangeStatus, TrendStatus};
pub use errors::*;
pub use logs::{merge_logs, upsert_log, MonthPayload};
pub use models::*;
pub use projection::{run_projection, simulate_fat_projection, simulate_projection, ProjectionRun};
pub use series::{Series, SeriesPoint};
pub use summary::{summarize, TrendSummary};
pub use types::*;
