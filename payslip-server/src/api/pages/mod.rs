//! Page Module

pub mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Public pages (no session required)
pub fn router() -> Router<ServerState> {
    Router::new().route("/", get(handler::login))
}

/// Pages behind the session gate
pub fn protected_router() -> Router<ServerState> {
    Router::new().route("/home", get(handler::home))
}
