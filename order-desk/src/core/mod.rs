//! Core: configuration and the assembled service set

pub mod config;
pub mod state;

pub use config::Config;
pub use state::DeskState;
