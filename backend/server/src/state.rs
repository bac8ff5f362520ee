use std::sync::Arc;

use tracing::info;

use super::{
    config::{Config, StoreKind},
    database::{TodoStore, init_redis},
    error::StartupError,
    memory::MemoryStore,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, StartupError> {
        let store: Arc<dyn TodoStore> = match config.store {
            StoreKind::Redis => {
                info!("Connecting to Redis...");
                Arc::new(init_redis(&config.redis_url, &config.redis_prefix).await?)
            }
            StoreKind::Memory => {
                info!("Using in-memory store, todos will not survive a restart");
                Arc::new(MemoryStore::default())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn TodoStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
