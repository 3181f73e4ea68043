use std::sync::Arc;

use crate::db::Database;
use crate::ledger::{LedgerRepository, TransferEngine};
use crate::user_auth::AuthService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
    pub auth: Arc<AuthService>,
    /// PostgreSQL pool for health checks; `None` when running on the in-memory store
    pub db: Option<Arc<Database>>,
}

impl AppState {
    /// Wire the engine and the auth service over one repository
    pub fn new(
        repo: Arc<dyn LedgerRepository>,
        jwt_secret: String,
        token_ttl_secs: u64,
        db: Option<Arc<Database>>,
    ) -> Self {
        Self {
            engine: Arc::new(TransferEngine::new(repo.clone())),
            auth: Arc::new(AuthService::new(repo, jwt_secret, token_ttl_secs)),
            db,
        }
    }
}
