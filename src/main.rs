//! wallet_ledger service
//!
//! Usage:
//! - `wallet_ledger [--env <name>]` serves the gateway with `config/<name>.yaml`
//!   (default `dev`)
//! - `wallet_ledger --open-wallet <owner-uuid>` creates the zero-balance wallet
//!   of a freshly registered owner in `default_currency` and exits

use anyhow::Context;
use std::sync::Arc;

use wallet_ledger::config::AppConfig;
use wallet_ledger::db::Database;
use wallet_ledger::gateway::{self, AppState};
use wallet_ledger::history::HistoryReader;
use wallet_ledger::logging;
use wallet_ledger::store::{LedgerStore, PgStore, postgres};
use wallet_ledger::transfer::TransferEngine;
use wallet_ledger::wallet::OwnerId;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_open_wallet() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--open-wallet" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;
    let _guard = logging::init_logging(&config);

    tracing::info!(env = %env, version = env!("BUILD_GIT_HASH"), "Starting wallet_ledger");

    let url = config
        .postgres_url
        .clone()
        .context("postgres_url is not configured (set DATABASE_URL)")?;

    let db = Database::connect(&url, &config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    postgres::init_schema(db.pool())
        .await
        .context("Failed to initialise schema")?;

    let store: Arc<dyn LedgerStore> = Arc::new(PgStore::new(db.pool().clone()));

    if let Some(raw) = get_open_wallet() {
        let owner: OwnerId = raw.parse().context("--open-wallet expects an owner UUID")?;
        let created = store.create_for_owner(owner, config.default_currency).await;
        db.close().await;
        let wallet = created?;
        tracing::info!(owner_id = %owner, wallet_id = %wallet.id, "Wallet opened");
        return Ok(());
    }

    let jwt_secret = config
        .jwt_secret
        .clone()
        .context("jwt_secret is not configured (set JWT_SECRET)")?;

    let engine = Arc::new(TransferEngine::new(store.clone()));
    let history = Arc::new(HistoryReader::new(store.clone(), &config.history));
    let state = Arc::new(AppState::new(engine, history, store, jwt_secret));

    let served = gateway::run_server(&config.gateway, state, shutdown_signal()).await;

    db.close().await;
    served
}
