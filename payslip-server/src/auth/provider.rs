//! Identity provider client
//!
//! The authentication protocol itself is delegated to an external OAuth2 /
//! OpenID provider; this module only drives the redirect handshake and maps
//! the provider's verified answer into an [`AuthedIdentity`]. Provider
//! settings are an explicit configuration struct built once at startup and
//! injected into the constructor.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Verified identity returned by the provider after a completed handshake
#[derive(Debug, Clone)]
pub struct AuthedIdentity {
    /// Stable external user id
    pub userid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Opaque provider access token
    pub access_token: String,
    /// Avatar location at the provider, if any
    pub avatar_url: Option<String>,
}

impl AuthedIdentity {
    /// Domain part of the account email, lowercased
    pub fn email_domain(&self) -> &str {
        self.email.rsplit('@').next().unwrap_or("")
    }
}

/// Identity provider settings, read once at startup
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Absolute URL of our `/auth/callback` route
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: String,
}

impl OAuthConfig {
    /// Load provider settings from the environment (Google endpoints by default)
    pub fn from_env(host: &str) -> Self {
        Self {
            client_id: std::env::var("OAUTH_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("OAUTH_CLIENT_SECRET").unwrap_or_default(),
            redirect_url: std::env::var("OAUTH_REDIRECT_URL")
                .unwrap_or_else(|_| format!("{}/auth/callback", host)),
            auth_url: std::env::var("OAUTH_AUTH_URL")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            token_url: std::env::var("OAUTH_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            userinfo_url: std::env::var("OAUTH_USERINFO_URL").unwrap_or_else(|_| {
                "https://openidconnect.googleapis.com/v1/userinfo".to_string()
            }),
            scopes: std::env::var("OAUTH_SCOPES")
                .unwrap_or_else(|_| "openid email profile".to_string()),
        }
    }
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("state mismatch, please sign in again")]
    StateMismatch,

    #[error("Invalid account, use a {0} account")]
    DomainNotAllowed(String),
}

/// External collaborator that verifies the caller's identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider URL to redirect the browser to
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange the callback code for a verified identity
    async fn complete(&self, code: &str) -> Result<AuthedIdentity, AuthError>;

    /// Fetch the raw avatar image bytes, if the provider published one
    async fn fetch_avatar(&self, url: &str) -> Result<Vec<u8>, AuthError>;
}

/// OpenID-Connect provider client (code flow over reqwest)
#[derive(Debug, Clone)]
pub struct OidcProvider {
    config: OAuthConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    picture: Option<String>,
}

impl OidcProvider {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    fn authorize_url(&self, state: &str) -> String {
        match Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", self.config.scopes.as_str()),
                ("state", state),
            ],
        ) {
            Ok(url) => url.into(),
            // auth_url comes from config; an unparseable value only shows up
            // here, so send the caller back to the login page
            Err(e) => {
                tracing::error!(error = %e, "Invalid provider auth_url");
                "/".to_string()
            }
        }
    }

    async fn complete(&self, code: &str) -> Result<AuthedIdentity, AuthError> {
        let token: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("token exchange failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AuthError::Provider(format!("token exchange rejected: {}", e)))?
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("bad token response: {}", e)))?;

        let info: UserInfo = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("userinfo fetch failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AuthError::Provider(format!("userinfo rejected: {}", e)))?
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("bad userinfo response: {}", e)))?;

        Ok(AuthedIdentity {
            userid: info.sub,
            first_name: info.given_name,
            last_name: info.family_name,
            email: info.email,
            access_token: token.access_token,
            avatar_url: info.picture,
        })
    }

    async fn fetch_avatar(&self, url: &str) -> Result<Vec<u8>, AuthError> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("avatar fetch failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AuthError::Provider(format!("avatar rejected: {}", e)))?
            .bytes()
            .await
            .map_err(|e| AuthError::Provider(format!("avatar read failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_state_and_redirect() {
        let provider = OidcProvider::new(OAuthConfig {
            client_id: "client-1".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost:3000/auth/callback".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            scopes: "openid email profile".to_string(),
        });

        let url = provider.authorize_url("nonce-1");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("state=nonce-1"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn email_domain_is_the_part_after_the_at_sign() {
        let identity = AuthedIdentity {
            userid: "u".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: "ada@example.com".to_string(),
            access_token: String::new(),
            avatar_url: None,
        };
        assert_eq!(identity.email_domain(), "example.com");
    }
}
