use std::sync::Arc;

use crate::history::HistoryReader;
use crate::store::LedgerStore;
use crate::transfer::TransferEngine;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
    pub history: Arc<HistoryReader>,
    /// For health pings
    pub store: Arc<dyn LedgerStore>,
    jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        engine: Arc<TransferEngine>,
        history: Arc<HistoryReader>,
        store: Arc<dyn LedgerStore>,
        jwt_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            engine,
            history,
            store,
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
