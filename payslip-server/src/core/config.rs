use std::path::PathBuf;

use crate::auth::{OAuthConfig, SessionConfig};

/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Work directory (database, media) |
/// | HTTP_PORT | 3000 | HTTP service port |
/// | HOST | http://localhost:3000 | Public base URL (OAuth redirect) |
/// | STATIC_DIR | static | Static asset directory |
/// | COMPANY_NAME | EXAMPLE CO | Brand line on rendered payslips |
/// | ALLOWED_EMAIL_DOMAIN | (none) | Restrict sign-in to one email domain |
/// | ENVIRONMENT | development | development \| production |
/// | SESSION_SECRET | (generated in dev) | Session signing secret |
/// | OAUTH_CLIENT_ID / OAUTH_CLIENT_SECRET | (none) | Provider credentials |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/var/lib/payslip HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database and generated documents
    pub work_dir: String,
    /// HTTP service port
    pub http_port: u16,
    /// Public base URL, used for the provider redirect
    pub host: String,
    /// Directory served under `/static`
    pub static_dir: String,
    /// Brand line rendered on every payslip
    pub company_name: String,
    /// When set, only accounts in this email domain may sign in
    pub allowed_email_domain: String,
    /// Session token configuration
    pub session: SessionConfig,
    /// Identity provider configuration
    pub oauth: OAuthConfig,
    /// Runtime environment: development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
            company_name: std::env::var("COMPANY_NAME").unwrap_or_else(|_| "EXAMPLE CO".into()),
            allowed_email_domain: std::env::var("ALLOWED_EMAIL_DOMAIN").unwrap_or_default(),
            session: SessionConfig::default(),
            oauth: OAuthConfig::from_env(&host),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            host,
        }
    }

    /// Database directory inside the work directory
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Generated document directory, served under `/media`
    pub fn media_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("media")
    }

    /// Create the work directory layout if it does not exist yet
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.media_dir())?;
        Ok(())
    }

    /// Production environment?
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Development environment?
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
