//! Payslip Server - internal payslip generation service
//!
//! # Overview
//!
//! Employees sign in through an external identity provider, fill in a
//! salary-details form, and receive a fixed-layout PDF payslip. The core
//! pipeline is session validation → form binding → identity resolution →
//! pay computation → document rendering.
//!
//! # Module structure
//!
//! ```text
//! payslip-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # session tokens, identity provider, session gate
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # embedded SurrealDB storage
//! ├── payslip/       # form binder, pay computation, document renderer
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod payslip;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, SessionService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult, setup_environment};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
