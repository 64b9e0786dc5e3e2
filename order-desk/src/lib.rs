//! Order Desk - back office for a food-delivery business
//!
//! # Overview
//!
//! Lists and filters customer orders, updates their status, and maintains the
//! menu catalog (categories, foods, sides) on a hosted PostgREST-style backend
//! with an object store for images.
//!
//! - **Order pipeline** (`orders`): date windows, status filter, profile join,
//!   item summaries, dashboard/payments aggregates
//! - **Stores** (`store`): row, blob and auth collaborators, in-memory and REST
//! - **Services** (`services`): orders, menu, images, sign-in
//!
//! # Module layout
//!
//! ```text
//! order-desk/src/
//! ├── core/          # config, assembled state
//! ├── orders/        # filter engine and friends (pure)
//! ├── services/      # async operations over the stores
//! ├── store/         # DataStore / BlobStore / Authenticator
//! ├── utils/         # logging, calendar helpers
//! └── cli.rs         # command-line front end
//! ```

pub mod cli;
pub mod core;
pub mod orders;
pub mod services;
pub mod store;
pub mod utils;

// Re-export public types
pub use core::{Config, DeskState};
pub use orders::{DashboardOrder, OrderFilterEngine, OrderListing};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read the configuration and install the logger
pub fn setup_environment() -> Config {
    // A missing .env is fine
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::debug!(environment = %config.environment, "Environment ready");
    if config.is_production() && config.api_key.is_empty() {
        tracing::warn!("SUPABASE_ANON_KEY is not set; backend requests will be rejected");
    }
    config
}
