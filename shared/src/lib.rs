//! Shared types for the order desk
//!
//! Row models of the hosted backend, the order list view state, the unified
//! error type and small formatting helpers. No I/O lives here.

pub mod error;
pub mod models;
pub mod util;
pub mod view;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use view::{DateFilter, OrderViewState, StatusFilter};
