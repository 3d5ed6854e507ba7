use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{IdentityProvider, OidcProvider, SessionService};
use crate::core::Config;
use crate::db::DbService;
use crate::payslip::PayslipRenderer;

/// Server state - shared handle bundle for every request
///
/// Cloning is shallow; the handles inside are reference-counted or
/// internally shared, so each request works on its own copy without
/// blocking the others.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | immutable settings |
/// | db | Surreal<Db> | embedded database |
/// | sessions | Arc<SessionService> | session token signing |
/// | provider | Arc<dyn IdentityProvider> | external identity collaborator |
/// | renderer | Arc<PayslipRenderer> | payslip document output |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub sessions: Arc<SessionService>,
    pub provider: Arc<dyn IdentityProvider>,
    pub renderer: Arc<PayslipRenderer>,
}

impl ServerState {
    /// Manual construction (tests inject their own provider here)
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        sessions: Arc<SessionService>,
        provider: Arc<dyn IdentityProvider>,
        renderer: Arc<PayslipRenderer>,
    ) -> Self {
        Self {
            config,
            db,
            sessions,
            provider,
            renderer,
        }
    }

    /// Initialize the server state
    ///
    /// Order: work directory layout, database, session service, identity
    /// provider, renderer.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized;
    /// the process has nothing useful to do without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");

        let sessions = Arc::new(SessionService::with_config(config.session.clone()));
        let provider: Arc<dyn IdentityProvider> =
            Arc::new(OidcProvider::new(config.oauth.clone()));
        let renderer = Arc::new(PayslipRenderer::new(
            config.media_dir(),
            config.company_name.clone(),
        ));

        Self {
            config: config.clone(),
            db: db_service.db,
            sessions,
            provider,
            renderer,
        }
    }
}
