//! Unified error handling
//!
//! Application-level error type and response structure:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API error payload
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E3xxx  | Session errors | E3001 not signed in |
//! | E0xxx  | Request errors | E0002 malformed input |
//! | E9xxx  | System errors  | E9002 storage error |
//!
//! Two error families redirect instead of answering with a status code:
//! authentication failures bounce to the login page and malformed form
//! submissions bounce back to `/home`, both carrying a human-readable
//! `?m=` message the page renders as a flash line.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::error;

use crate::auth::{AuthError, SessionError};
use crate::db::repository::RepoError;
use crate::payslip::BindError;

/// API error payload
///
/// ```json
/// {
///   "code": "E9002",
///   "message": "Storage error"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse {
    /// Error code
    pub code: String,
    /// Message
    pub message: String,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Session errors (redirect or 401) ==========
    #[error("Authentication required")]
    /// No valid session (401)
    Unauthorized,

    #[error("Session expired")]
    /// Session token expired (401)
    TokenExpired,

    #[error("Invalid session token")]
    /// Session token failed validation (401)
    InvalidToken,

    // ========== Workflow errors (redirect with message) ==========
    #[error("Authentication failed: {0}")]
    /// Identity provider failure or disallowed account, shown on the login page
    AuthFailure(String),

    #[error("Malformed input: {0}")]
    /// Form binding rejected a field, shown on the home page
    MalformedInput(String),

    // ========== Request errors (4xx) ==========
    #[error("Resource not found: {0}")]
    /// Missing resource (404)
    NotFound(String),

    // ========== System errors (5xx) ==========
    #[error("Storage error: {0}")]
    /// Storage gateway failure, including lost upsert races (500)
    Storage(String),

    #[error("Render error: {0}")]
    /// Document write failure (500)
    Render(String),

    #[error("Internal server error: {0}")]
    /// Anything else (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please sign in first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Session expired"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid session"),

            // Auth failures carry their message back to the login page
            AppError::AuthFailure(msg) => {
                return Redirect::to(&flash_path("/", msg)).into_response();
            }

            // Bind failures carry their message back to the home page
            AppError::MalformedInput(msg) => {
                return Redirect::to(&flash_path("/home", msg)).into_response();
            }

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Storage error")
            }

            AppError::Render(msg) => {
                error!(target: "render", error = %msg, "Document render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9003",
                    "Document could not be generated",
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

/// Build a redirect path carrying a `?m=` flash message
pub fn flash_path(base: &str, message: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("m", message)
        .finish();
    format!("{}?{}", base, query)
}

// ========== Helper Constructors ==========

impl AppError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

// ========== Conversions from layer errors ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            // A lost upsert race is a storage failure, not a success path
            RepoError::Duplicate(msg) => AppError::Storage(format!("concurrent creation: {}", msg)),
            RepoError::Database(msg) => AppError::Storage(msg),
            RepoError::Validation(msg) => AppError::Internal(msg),
        }
    }
}

impl From<BindError> for AppError {
    fn from(e: BindError) -> Self {
        AppError::MalformedInput(e.to_string())
    }
}

impl From<payslip_pdf::RenderError> for AppError {
    fn from(e: payslip_pdf::RenderError) -> Self {
        AppError::Render(e.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::ExpiredToken => AppError::TokenExpired,
            SessionError::InvalidToken(_) | SessionError::InvalidSignature => {
                AppError::InvalidToken
            }
            SessionError::GenerationFailed(msg) | SessionError::ConfigError(msg) => {
                AppError::Internal(msg)
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::AuthFailure(e.to_string())
    }
}
