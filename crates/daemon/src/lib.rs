#![forbid(unsafe_code)]

//! Status light daemon: HTTP surface and SurrealDB storage.

pub mod config;
pub mod db;
pub mod http;

use std::sync::Arc;

use trafficlight_core::{Gate, KvStore, LightRepository, MemoryStore, StoreResult};

use crate::config::{Config, MEMORY_STORE};
use crate::db::SurrealStore;

/// Open the store named by `config.store_url`.
pub async fn open_store(config: &Config) -> StoreResult<Arc<dyn KvStore>> {
    if config.store_url == MEMORY_STORE {
        tracing::warn!("using in-process memory store; state is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SurrealStore::connect(&config.store_url, config.credentials.clone()).await?;
    Ok(Arc::new(store))
}

/// Wire the router over an opened store.
pub fn app(config: &Config, store: Arc<dyn KvStore>) -> axum::Router {
    let gate = Gate::new(config.secret.clone(), config.mode);
    if !gate.has_secret() {
        tracing::warn!("no webhook secret configured; all webhooks will be refused");
    }
    http::router(http::AppState::new(LightRepository::new(store), gate))
}
