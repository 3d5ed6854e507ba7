//! Payslip Handlers
//!
//! The request-to-document pipeline: bind the submitted form, resolve the
//! requesting identity, stamp and persist the record, render the document,
//! and hand the browser its media path.

use std::collections::HashMap;

use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::api::template::{fill, html_escape};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{PayslipRepository, UserRepository};
use crate::payslip::bind_payslip;
use crate::utils::{AppError, AppResult};

const PAYSLIP_PAGE: &str = include_str!("../../../assets/payslip.html");

/// Payslip form page
pub async fn form(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Response> {
    let repo = UserRepository::new(state.db.clone());
    let Some(user) = repo.find_by_userid(&current.userid).await? else {
        return Ok(Redirect::to("/logout").into_response());
    };

    let page = fill(
        PAYSLIP_PAGE,
        &[
            ("firstname", &html_escape(&user.first_name)),
            ("lastname", &html_escape(&user.last_name)),
        ],
    );
    Ok(Html(page).into_response())
}

/// Form submission: produce (or replace) the caller's payslip document
///
/// Bind failures bounce back to `/home` with the offending field in the
/// flash message. Storage and render failures abort the request; the
/// browser is never redirected to a document that was not written.
pub async fn submit(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let draft = bind_payslip(&fields).map_err(|e| {
        tracing::warn!(error = %e, "Payslip form rejected");
        AppError::from(e)
    })?;

    let users = UserRepository::new(state.db.clone());
    let Some(requestor) = users.find_by_userid(&current.userid).await? else {
        return Ok(Redirect::to("/logout").into_response());
    };

    let payslip = draft.into_payslip(requestor, Utc::now());

    PayslipRepository::new(state.db.clone())
        .upsert(&payslip)
        .await?;

    state.renderer.render_to_file(&payslip)?;

    tracing::info!(payslip_id = %payslip.payslip_id, "Payslip generated");
    Ok(Redirect::to(&format!("/media/{}.pdf", payslip.payslip_id)).into_response())
}
