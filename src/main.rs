use std::sync::Arc;

use anyhow::Context;

use ledger_engine::config::{AppConfig, StoreBackend};
use ledger_engine::db::{Database, schema};
use ledger_engine::gateway::{self, state::AppState};
use ledger_engine::ledger::{InMemoryLedgerRepository, LedgerRepository, PgLedgerRepository};
use ledger_engine::logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

/// Run on the in-process store instead of PostgreSQL (--memory)
fn use_memory_store() -> bool {
    std::env::args().any(|a| a == "--memory")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = logging::init_logging(&app_config);

    tracing::info!("Starting ledger engine in {} mode", env);

    let (repo, db): (Arc<dyn LedgerRepository>, Option<Arc<Database>>) =
        match app_config.store_backend(use_memory_store())? {
            StoreBackend::Postgres(url) => {
                let db = Database::connect(&url, app_config.postgres_max_connections)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                schema::init_schema(db.pool()).await?;
                let repo: Arc<dyn LedgerRepository> =
                    Arc::new(PgLedgerRepository::new(db.pool().clone()));
                (repo, Some(Arc::new(db)))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory ledger store; data is lost on exit");
                let repo: Arc<dyn LedgerRepository> = Arc::new(InMemoryLedgerRepository::new());
                (repo, None)
            }
        };

    let state = Arc::new(AppState::new(
        repo,
        app_config.auth.jwt_secret.clone(),
        app_config.auth.token_ttl_secs,
        db,
    ));

    let port = get_port_override().unwrap_or(app_config.gateway.port);
    gateway::run_server(&app_config.gateway.host, port, state).await
}
