use std::sync::Arc;

use tracing::{info, warn};

use super::{
    config::Config,
    database::{RedisStore, Store},
    error::AppError,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load();
        info!("Loaded access codes for {} event(s)", config.invite_codes.len());

        let store = RedisStore::open(config.redis_url()?)?;

        // a failed warm-up is retried by the first request that needs storage
        if let Err(e) = store.connection().await {
            warn!("Redis not reachable yet: {e}");
        }

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
