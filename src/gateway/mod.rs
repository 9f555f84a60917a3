//! HTTP Gateway
//!
//! Thin axum surface over the transfer engine and history reader.
//!
//! | Route | Auth | Handler |
//! |---|---|---|
//! | `GET /health` | - | store ping |
//! | `GET /wallet/balance` | Bearer | caller's wallet |
//! | `POST /wallet/transfer` | Bearer | transfer |
//! | `GET /wallet/transactions` | Bearer | history page |

pub mod auth;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
pub use state::AppState;

/// Build the router with all routes and the auth layer
pub fn build_router(state: Arc<AppState>) -> Router {
    let wallet_routes = Router::new()
        .route("/balance", get(handlers::get_balance))
        .route("/transfer", post(handlers::create_transfer))
        .route("/transactions", get(handlers::get_transactions))
        .layer(from_fn_with_state(
            state.clone(),
            auth::jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/wallet", wallet_routes)
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves, then drain in-flight requests
pub async fn run_server(
    config: &GatewayConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    serve(listener, state, shutdown).await
}

/// Serve on an already-bound listener
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "Gateway listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Gateway server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}
