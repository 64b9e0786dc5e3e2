//! Utilities: error re-exports, logging, calendar helpers

pub mod logger;
pub mod time;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
