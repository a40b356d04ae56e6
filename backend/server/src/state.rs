use std::sync::Arc;

use tracing::info;

use super::{
    config::{Backend, Config},
    database::{RedisStore, Store},
    error::AppError,
    memory::MemoryStore,
};

/// Shared by every handler. The store is the only resource requests share.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let store: Arc<dyn Store> = match config.backend {
            Backend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
            Backend::Memory => {
                info!("Using in-memory store, nothing will be persisted");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
