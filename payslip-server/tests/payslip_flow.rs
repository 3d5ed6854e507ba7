//! End-to-end flow tests over the in-memory database
//!
//! Drives the real router with a stub identity provider: sign in through
//! the callback, submit the form, and follow the redirect contract down to
//! the rendered media file.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use payslip_server::auth::{
    AuthError, AuthedIdentity, IdentityProvider, OAuthConfig, SessionConfig, SessionService,
};
use payslip_server::core::{Config, ServerState};
use payslip_server::db::DbService;
use payslip_server::payslip::PayslipRenderer;
use tower::ServiceExt;

/// Identity provider stub: every code exchange yields the same verified user
struct StubProvider;

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://provider.test/auth?state={}", state)
    }

    async fn complete(&self, _code: &str) -> Result<AuthedIdentity, AuthError> {
        Ok(AuthedIdentity {
            userid: "stub-user-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            access_token: "opaque-token".to_string(),
            avatar_url: Some("https://provider.test/avatar.png".to_string()),
        })
    }

    async fn fetch_avatar(&self, _url: &str) -> Result<Vec<u8>, AuthError> {
        Ok(b"avatar-bytes".to_vec())
    }
}

fn test_config(work_dir: &std::path::Path, allowed_domain: &str) -> Config {
    let host = "http://localhost:3000".to_string();
    Config {
        work_dir: work_dir.to_string_lossy().to_string(),
        http_port: 0,
        static_dir: work_dir.join("static").to_string_lossy().to_string(),
        company_name: "EXAMPLE CO".to_string(),
        allowed_email_domain: allowed_domain.to_string(),
        session: SessionConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "payslip-server".to_string(),
        },
        oauth: OAuthConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: format!("{}/auth/callback", host),
            auth_url: "https://provider.test/auth".to_string(),
            token_url: "https://provider.test/token".to_string(),
            userinfo_url: "https://provider.test/userinfo".to_string(),
            scopes: "openid email profile".to_string(),
        },
        environment: "development".to_string(),
        host,
    }
}

async fn test_app(work_dir: &std::path::Path, allowed_domain: &str) -> (Router, ServerState) {
    let config = test_config(work_dir, allowed_domain);
    let db = DbService::memory().await.unwrap();
    let state = ServerState::new(
        config.clone(),
        db.db,
        Arc::new(SessionService::with_config(config.session.clone())),
        Arc::new(StubProvider),
        Arc::new(PayslipRenderer::new(
            config.media_dir(),
            config.company_name.clone(),
        )),
    );
    (payslip_server::api::router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// First Set-Cookie value, up to the attribute list
fn first_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|c| c.split(';').next())
        .unwrap_or_default()
        .to_string()
}

/// Drive /auth/start and /auth/callback, returning the session cookie pair
async fn sign_in(app: &Router) -> String {
    let start = app.clone().oneshot(get("/auth/start")).await.unwrap();
    assert_eq!(start.status(), StatusCode::SEE_OTHER);

    let state_cookie = first_cookie(&start);
    let (_, nonce) = state_cookie.split_once('=').unwrap();
    assert!(location(&start).contains(nonce));

    let callback = app
        .clone()
        .oneshot(get_with_cookie(
            &format!("/auth/callback?code=fake-code&state={}", nonce),
            &state_cookie,
        ))
        .await
        .unwrap();
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/home");

    let session_cookie = first_cookie(&callback);
    assert!(session_cookie.starts_with("payslip_session="));
    session_cookie
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn anonymous_home_is_redirected_to_login() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "").await;

    let response = app.oneshot(get("/home")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn login_page_renders_the_flash_message() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "").await;

    let response = app
        .oneshot(get("/?m=Invalid%20account"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Invalid account"));
    assert!(body.contains("/auth/start"));
}

#[tokio::test]
async fn sign_in_then_home_shows_the_profile() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "").await;

    let session = sign_in(&app).await;
    let response = app
        .clone()
        .oneshot(get_with_cookie("/home", &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Ada"));
    assert!(body.contains("Lovelace"));
}

#[tokio::test]
async fn disallowed_domain_is_bounced_with_a_message() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "corp.test").await;

    let start = app.clone().oneshot(get("/auth/start")).await.unwrap();
    let state_cookie = first_cookie(&start);
    let (_, nonce) = state_cookie.split_once('=').unwrap();

    let callback = app
        .clone()
        .oneshot(get_with_cookie(
            &format!("/auth/callback?code=fake-code&state={}", nonce),
            &state_cookie,
        ))
        .await
        .unwrap();

    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    let target = location(&callback);
    assert!(target.starts_with("/?m="));
    assert!(target.contains("corp.test"));
}

#[tokio::test]
async fn callback_with_a_foreign_state_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "").await;

    let start = app.clone().oneshot(get("/auth/start")).await.unwrap();
    let state_cookie = first_cookie(&start);

    let callback = app
        .clone()
        .oneshot(get_with_cookie(
            "/auth/callback?code=fake-code&state=forged",
            &state_cookie,
        ))
        .await
        .unwrap();

    // Auth failures bounce to the login page with a message
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert!(location(&callback).starts_with("/?m="));
}

#[tokio::test]
async fn submitting_the_form_writes_and_serves_the_document() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(tmp.path(), "").await;
    let session = sign_in(&app).await;

    let body = "name=Ada+Lovelace&day=2023-04-01&month=2023-04-01&salary=660000&amount=550000\
                &tds=0&accountno=0042&ifsccode=ABCD0001&position=Engineer&employeeno=";
    let request = Request::builder()
        .method("POST")
        .uri("/payslip")
        .header(header::COOKIE, &session)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/media/stub-user-1.pdf");

    let document = state.config.media_dir().join("stub-user-1.pdf");
    let bytes = std::fs::read(&document).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    // The media route serves the freshly written document
    let served = app
        .clone()
        .oneshot(get("/media/stub-user-1.pdf"))
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_date_bounces_back_home_naming_the_field() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = test_app(tmp.path(), "").await;
    let session = sign_in(&app).await;

    let body = "day=2023-13-40&salary=1000&amount=500";
    let request = Request::builder()
        .method("POST")
        .uri("/payslip")
        .header(header::COOKIE, &session)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/home?m="));
    assert!(target.contains("day"));

    // No document was written for the failed bind
    assert!(!state.config.media_dir().join("stub-user-1.pdf").exists());
}

#[tokio::test]
async fn unknown_route_renders_the_404_page() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "").await;

    let response = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("404"));
}

#[tokio::test]
async fn logout_expires_the_session_cookie() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = test_app(tmp.path(), "").await;
    let session = sign_in(&app).await;

    let response = app
        .clone()
        .oneshot(get_with_cookie("/logout", &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    assert!(cleared.contains("payslip_session=;"));
    assert!(cleared.contains("Max-Age=0"));
}
