use thiserror::Error;

/// Top-level server errors (startup and serving)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Result alias for server startup and run
pub type Result<T> = std::result::Result<T, ServerError>;
