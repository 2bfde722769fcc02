// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;
pub mod migrations;
pub mod state;
#[cfg(test)]
pub mod test_support;
pub mod validation;

pub use config::AppConfig;
pub use error::ApiError;
pub use helpers::{mask_email, mask_token};
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
