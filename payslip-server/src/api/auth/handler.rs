//! Authentication Handlers
//!
//! Drives the redirect handshake with the external identity provider and
//! owns the session cookie lifecycle. The provider is opaque: it returns a
//! verified identity or an error, nothing protocol-specific leaks past the
//! auth module.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AuthError, SessionService};
use crate::core::ServerState;
use crate::db::models::UserUpsert;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult, flash_path};

/// Short-lived cookie carrying the handshake state nonce
const STATE_COOKIE: &str = "payslip_oauth_state";

/// Begin authentication: remember a state nonce and bounce to the provider
pub async fn start(State(state): State<ServerState>) -> impl IntoResponse {
    let nonce = Uuid::new_v4().to_string();
    let url = state.provider.authorize_url(&nonce);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=600",
        STATE_COOKIE, nonce
    );
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(&url))
}

/// Query parameters the provider redirects back with
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Complete authentication: verify the handshake, refresh the stored user,
/// open a session
///
/// Failures before the storage step redirect back to the login page with a
/// readable message and leave no server-side record. Storage failures are
/// real 5xx errors; a lost upsert race must not be silently swallowed.
pub async fn callback(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Response> {
    if let Some(err) = query.error {
        tracing::warn!(target: "security", error = %err, "Provider reported an error");
        return Err(AuthError::Provider(err).into());
    }

    let code = query
        .code
        .ok_or_else(|| AuthError::Provider("missing authorization code".to_string()))?;

    // The state nonce must round-trip through the cookie
    let expected = SessionService::extract_from_headers(&headers, STATE_COOKIE);
    if expected.is_none() || expected != query.state.as_deref() {
        tracing::warn!(target: "security", "Authentication state mismatch");
        return Err(AuthError::StateMismatch.into());
    }

    let identity = state.provider.complete(&code).await?;

    // Internal tool: optionally restricted to one account domain
    let allowed = &state.config.allowed_email_domain;
    if !allowed.is_empty() && identity.email_domain() != allowed.as_str() {
        tracing::warn!(
            target: "security",
            email = %identity.email,
            "Sign-in from a disallowed account domain"
        );
        let message = AuthError::DomainNotAllowed(allowed.clone()).to_string();
        return Ok((
            AppendHeaders([(SET_COOKIE, SessionService::clear_cookie())]),
            Redirect::to(&flash_path("/", &message)),
        )
            .into_response());
    }

    // Avatar is stored as an encoded blob; a fetch failure only costs the image
    let avatar = match identity.avatar_url.as_deref() {
        Some(url) => match state.provider.fetch_avatar(url).await {
            Ok(bytes) => BASE64.encode(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Avatar fetch failed");
                String::new()
            }
        },
        None => String::new(),
    };

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .upsert(UserUpsert {
            userid: identity.userid,
            first_name: identity.first_name,
            last_name: identity.last_name,
            email: identity.email,
            access_token: identity.access_token,
            avatar,
        })
        .await?;

    let token = state.sessions.issue(&user.userid).map_err(AppError::from)?;

    tracing::info!(userid = %user.userid, "User signed in");
    Ok((
        AppendHeaders([(SET_COOKIE, state.sessions.cookie(&token))]),
        Redirect::to("/home"),
    )
        .into_response())
}

/// Expire the session cookie and return to the login page
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, SessionService::clear_cookie())]),
        Redirect::to("/"),
    )
}
