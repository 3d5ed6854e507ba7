//! API routing module
//!
//! # Structure
//!
//! - [`pages`] - login and home pages, 404
//! - [`auth`] - identity provider handshake and session lifecycle
//! - [`payslip`] - payslip form and document generation
//! - [`template`] - page shell helpers
//!
//! `/static` serves fixed assets; `/media` serves generated documents.

pub mod template;

pub mod auth;
pub mod pages;
pub mod payslip;

use axum::{Router, middleware};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::require_session;
use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    // Pages behind the session gate
    let protected = Router::new()
        .merge(pages::protected_router())
        .merge(payslip::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(protected)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .nest_service("/media", ServeDir::new(state.config.media_dir()))
        .fallback(pages::handler::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
