//! Payslip API Module

pub mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Payslip routes (session required; the caller wires the gate)
pub fn router() -> Router<ServerState> {
    Router::new().route("/payslip", get(handler::form).post(handler::submit))
}
