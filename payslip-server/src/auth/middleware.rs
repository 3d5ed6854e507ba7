//! Session middleware
//!
//! Gate for the authenticated page group: validates the session cookie and
//! injects [`CurrentUser`] into the request extensions. Anonymous or stale
//! sessions are sent back to the login page rather than answered with 401,
//! since every caller here is a browser.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{Claims, SESSION_COOKIE, SessionService};
use crate::core::ServerState;

/// Authenticated caller, extracted from a validated session token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// External user id
    pub userid: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self { userid: claims.sub }
    }
}

/// Session middleware - requires a signed-in user
///
/// Reads the session cookie, validates the token, and injects
/// [`CurrentUser`]. A missing, expired or invalid session redirects to `/`.
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = SessionService::extract_from_headers(req.headers(), SESSION_COOKIE);

    let Some(token) = token else {
        return Redirect::to("/").into_response();
    };

    match state.sessions.validate(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Session rejected");
            Redirect::to("/").into_response()
        }
    }
}
