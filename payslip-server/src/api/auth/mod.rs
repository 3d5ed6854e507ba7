//! Authentication API Module

pub mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Authentication routes (public by design)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth/start", get(handler::start))
        .route("/auth/callback", get(handler::callback))
        .route("/logout", get(handler::logout))
}
