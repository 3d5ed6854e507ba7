//! Repository Module
//!
//! Provides lookup and upsert operations over the SurrealDB collections.

pub mod payslip;
pub mod user;

// Re-exports
pub use payslip::PayslipRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Map an insert-time error, detecting unique-index violations.
///
/// When two requests race to create the same record, the unique index
/// rejects the loser; that surfaces here as `Duplicate` rather than a
/// generic database error.
pub(crate) fn map_create_err(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains("already contains") {
        RepoError::Duplicate(msg)
    } else {
        RepoError::Database(msg)
    }
}
