//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResponse`] - application error types
//! - [`logger`] - tracing setup
//! - [`setup_environment`] - dotenv + logger bootstrap

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse, flash_path};
pub use result::AppResult;

/// Load `.env` and initialize logging
///
/// Called once at process start, before config is read.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    logger::init_logger_with_file(log_level.as_deref(), None);
}
