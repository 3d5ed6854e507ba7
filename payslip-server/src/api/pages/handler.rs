//! Page Handlers
//!
//! Login and home pages, plus the catch-all 404.

use axum::{
    Extension,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::api::template::{fill, html_escape};
use crate::auth::{CurrentUser, SESSION_COOKIE, SessionService};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

const LOGIN_PAGE: &str = include_str!("../../../assets/login.html");
const HOME_PAGE: &str = include_str!("../../../assets/home.html");
const NOT_FOUND_PAGE: &str = include_str!("../../../assets/notfound.html");

/// Flash message carried in the query string
#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    #[serde(default)]
    pub m: Option<String>,
}

/// Login page
///
/// Callers that already hold a valid session go straight to `/home`;
/// everyone else gets the sign-in page, with the `?m=` flash rendered
/// when present (auth failures land here with one).
pub async fn login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<FlashQuery>,
) -> Response {
    let signed_in = SessionService::extract_from_headers(&headers, SESSION_COOKIE)
        .is_some_and(|token| state.sessions.validate(token).is_ok());
    if signed_in {
        return Redirect::to("/home").into_response();
    }

    let message = query.m.as_deref().unwrap_or("");
    Html(fill(LOGIN_PAGE, &[("message", &html_escape(message))])).into_response()
}

/// Home page for a signed-in user
pub async fn home(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<FlashQuery>,
) -> AppResult<Response> {
    let repo = UserRepository::new(state.db.clone());
    let Some(user) = repo.find_by_userid(&current.userid).await? else {
        // Valid session but no stored profile: sign the stale session out
        return Ok(Redirect::to("/logout").into_response());
    };

    let message = query.m.as_deref().unwrap_or("");
    let page = fill(
        HOME_PAGE,
        &[
            ("firstname", &html_escape(&user.first_name)),
            ("lastname", &html_escape(&user.last_name)),
            ("avatar", &user.avatar),
            ("message", &html_escape(message)),
        ],
    );
    Ok(Html(page).into_response())
}

/// Catch-all 404 page
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE))
}
