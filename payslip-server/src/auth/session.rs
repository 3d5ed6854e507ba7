//! Session token service
//!
//! Issues and validates the signed session tokens that ride in the
//! `payslip_session` cookie. One process-wide signing secret; tokens carry
//! only the external user id.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "payslip_session";

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime (minutes)
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let secret = match load_session_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("Session secret error: {}, generating a development key", e);
                    generate_dev_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: SESSION_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("SESSION_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("SESSION_ISSUER")
                .unwrap_or_else(|_| "payslip-server".to_string()),
        }
    }
}

/// Claims stored in the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External user id (subject)
    pub sub: String,
    /// Token type
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// Session token errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Load the signing secret from the environment
fn load_session_secret() -> Result<String, SessionError> {
    match std::env::var("SESSION_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(SessionError::ConfigError(
                    "SESSION_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => Err(SessionError::ConfigError(
            "SESSION_SECRET environment variable is not set".to_string(),
        )),
    }
}

/// Random per-process secret for development runs
#[cfg(debug_assertions)]
fn generate_dev_secret() -> String {
    use uuid::Uuid;

    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Session token service
#[derive(Debug, Clone)]
pub struct SessionService {
    pub config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    /// Create a service with the default (environment) configuration
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a service with an explicit configuration
    pub fn with_config(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a session token for an authenticated user
    pub fn issue(&self, userid: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: userid.to_string(),
            token_type: "session".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a session token
    pub fn validate(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::ExpiredToken,
                ErrorKind::InvalidSignature => SessionError::InvalidSignature,
                ErrorKind::InvalidToken => SessionError::InvalidToken(e.to_string()),
                _ => SessionError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Serialize a token into its Set-Cookie value
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.config.expiration_minutes * 60
        )
    }

    /// Set-Cookie value that expires the session cookie
    pub fn clear_cookie() -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }

    /// Extract a named cookie's value from a Cookie header
    pub fn extract_from_cookie_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
        header.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
    }

    /// Extract a named cookie's value from request headers
    pub fn extract_from_headers<'a>(
        headers: &'a http::HeaderMap,
        name: &str,
    ) -> Option<&'a str> {
        headers
            .get(http::header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| Self::extract_from_cookie_header(h, name))
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> SessionService {
        SessionService::with_config(SessionConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "payslip-server".to_string(),
        })
    }

    #[test]
    fn issue_then_validate_round_trips() {
        let service = test_service();
        let token = service.issue("user-1").unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "payslip-server");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let token = service.issue("user-1").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = SessionService::with_config(SessionConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_minutes: -10,
            issuer: "payslip-server".to_string(),
        });
        let token = service.issue("user-1").unwrap();
        assert!(matches!(
            service.validate(&token),
            Err(SessionError::ExpiredToken)
        ));
    }

    #[test]
    fn cookie_header_parsing_finds_the_session() {
        let header = "theme=dark; payslip_session=abc.def.ghi; other=1";
        assert_eq!(
            SessionService::extract_from_cookie_header(header, SESSION_COOKIE),
            Some("abc.def.ghi")
        );
        assert_eq!(
            SessionService::extract_from_cookie_header("theme=dark", SESSION_COOKIE),
            None
        );
    }
}
