//! Database Module
//!
//! Embedded SurrealDB storage: connection, namespace selection and schema.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Namespace and database name for all collections
const NAMESPACE: &str = "payslip";
const DATABASE: &str = "payslip";

/// Schema: uniqueness of external identifiers is enforced by the storage
/// layer itself, one index per collection.
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS user_userid ON TABLE user COLUMNS userid UNIQUE;
    DEFINE TABLE IF NOT EXISTS payslip SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS payslip_payslip_id ON TABLE payslip COLUMNS payslip_id UNIQUE;
";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database under `db_dir`
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to open database: {}", e)))?;

        Self::prepare(&db).await?;

        tracing::info!(path = %db_dir.display(), "Database connection established");
        Ok(Self { db })
    }

    /// Open an in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        use surrealdb::engine::local::Mem;

        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::storage(format!("Failed to open database: {}", e)))?;

        Self::prepare(&db).await?;
        Ok(Self { db })
    }

    async fn prepare(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::storage(format!("Failed to select namespace: {}", e)))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::storage(format!("Failed to define schema: {}", e)))?
            .check()
            .map_err(|e| AppError::storage(format!("Schema definition rejected: {}", e)))?;

        Ok(())
    }
}
