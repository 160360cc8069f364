use std::collections::HashMap;
use std::sync::Arc;

use access_db::Stores;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Application shared state accessible from axum handlers and background tasks.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration
    config: RwLock<AppConfig>,
    /// Entity stores
    stores: Stores,
    /// Settings fetched from the remote configuration endpoint
    remote_config: RwLock<HashMap<String, String>>,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Create shared state from already-opened stores and loaded config.
    pub fn new(stores: Stores, config: AppConfig) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config: RwLock::new(config),
                stores,
                remote_config: RwLock::new(HashMap::new()),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner
            .config
            .try_read()
            .map(|c| c.server_port)
            .unwrap_or(8000)
    }

    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get a read lock on the current config.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().await
    }

    pub async fn remote_config(&self) -> HashMap<String, String> {
        self.inner.remote_config.read().await.clone()
    }

    pub async fn set_remote_config(&self, settings: HashMap<String, String>) {
        *self.inner.remote_config.write().await = settings;
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
